// Editor session records
use serde::{Deserialize, Serialize};

/// The signed-in user record kept under the session key of local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The project currently open in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentProject {
    pub id: String,
    pub name: String,
}
