#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    /// Display name is the local part of the address.
    pub fn from_email(id: impl Into<String>, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: id.into(),
            email: email.to_string(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_local_part() {
        let u = User::from_email("1", "jane.doe@example.com");
        assert_eq!(u.name, "jane.doe");
        assert_eq!(u.email, "jane.doe@example.com");
    }

    #[test]
    fn address_without_at_keeps_whole_string() {
        assert_eq!(User::from_email("1", "jane").name, "jane");
    }
}
