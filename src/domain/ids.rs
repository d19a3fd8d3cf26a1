// Identifier generation for documents and components
use uuid::Uuid;

/// Generate a short opaque identifier.
///
/// Uses the first 12 hex digits of a v4 UUID, which is plenty for ids that
/// only need to be unique inside a single dashboard document.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}
