use serde::{Deserialize, Serialize};
use validator::validate_email;

use bistro_core::{DomainError, DomainResult, Entity, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
}

/// A vendor that inventory items name in their `supplier` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: RecordId,
    name: String,
    contact: String,
    email: String,
}

impl Supplier {
    pub fn create(id: RecordId, input: NewSupplier) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let email = input.email.trim();
        if !email.is_empty() && !validate_email(email) {
            return Err(DomainError::validation("email is not a valid address"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            contact: input.contact.trim().to_string(),
            email: email.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for Supplier {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str) -> NewSupplier {
        NewSupplier {
            name: "Fresh Farms".to_string(),
            contact: "+91 98765 43210".to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_plain_address() {
        let s = Supplier::create(RecordId::new(), input("orders@freshfarms.com")).unwrap();
        assert_eq!(s.email(), "orders@freshfarms.com");
    }

    #[test]
    fn email_is_optional() {
        let s = Supplier::create(RecordId::new(), input("")).unwrap();
        assert_eq!(s.email(), "");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "freshfarms.com",
            "@x.com",
            "a@b@c.com",
            "a b@c.com",
            "a@.com",
            "a@b..c",
            "a@-.x",
            "<>@x.y",
            "a@b,c.d",
        ] {
            assert!(
                Supplier::create(RecordId::new(), input(bad)).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_blank_name() {
        let err = Supplier::create(
            RecordId::new(),
            NewSupplier {
                name: " ".to_string(),
                ..input("")
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }
}
