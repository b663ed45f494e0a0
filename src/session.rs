use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subscription {
    Free,
    Basic,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub plan: Subscription,
}

/// Who is using the dashboard. Built once in `main` and passed down.
///
/// Sign-in is not verified: every email maps to the same teacher profile.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn signed_in(email: &str) -> Self {
        let mut session = Self::default();
        session.sign_in(email);
        session
    }

    pub fn sign_in(&mut self, email: &str) -> &User {
        self.user.insert(User {
            id: "1".to_string(),
            email: email.trim().to_string(),
            name: "John Doe".to_string(),
            role: Role::Teacher,
            plan: Subscription::Pro,
        })
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_uses_the_given_email() {
        let session = Session::signed_in(" teacher@school.test ");
        let user = session.user().expect("signed in");
        assert_eq!(user.email, "teacher@school.test");
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.plan, Subscription::Pro);
    }

    #[test]
    fn sign_out_clears_the_user() {
        let mut session = Session::signed_in("teacher@example.com");
        session.sign_out();
        assert!(session.user().is_none());
    }
}
