use uuid::Uuid;

/// Generate a fresh item identifier.
///
/// Random (v4) UUID in hyphenated lowercase form. Uniqueness is probabilistic;
/// the store is never consulted.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}
