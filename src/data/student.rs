use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Student {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
}

#[cfg(test)]
impl Student {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            department: department.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Student {
    /// Makes sure the student has an id, generating a fresh `ObjectId` if it is missing or empty.
    pub fn identified(mut self) -> (String, Self) {
        let id = match self.id.take() {
            Some(id) if !id.is_empty() => id,
            _ => ObjectId::new().to_hex(),
        };
        self.id = Some(id.clone());
        (id, self)
    }
}
