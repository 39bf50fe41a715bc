//! Short identifiers shared by projects, assessments and reports

/// New 8-character lowercase hex identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')), "{}", id);
        assert_ne!(new_id(), new_id());
    }
}
