//! The username/password matrix and its trial order.
//!
//! Trials run username-major: every password is tried for the first
//! username before the second username is touched. Trial `n` is therefore
//! `(usernames[n / passwords.len()], passwords[n % passwords.len()])`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialMatrix {
    usernames: Vec<String>,
    passwords: Vec<String>,
}

impl CredentialMatrix {
    pub fn new(usernames: Vec<String>, passwords: Vec<String>) -> Self {
        Self {
            usernames,
            passwords,
        }
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub fn passwords(&self) -> &[String] {
        &self.passwords
    }

    /// Total number of pairs in the cross-product.
    pub fn len(&self) -> usize {
        self.usernames.len().saturating_mul(self.passwords.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The credential tried at zero-based position `n`.
    pub fn trial(&self, n: usize) -> Option<Credential> {
        if n >= self.len() {
            return None;
        }
        let per_user = self.passwords.len();
        Some(Credential::new(
            self.usernames[n / per_user].as_str(),
            self.passwords[n % per_user].as_str(),
        ))
    }

    /// Iterates `(trial index, credential)` in trial order.
    pub fn trials(&self) -> impl Iterator<Item = (usize, Credential)> + '_ {
        self.usernames
            .iter()
            .flat_map(move |user| {
                self.passwords
                    .iter()
                    .map(move |pass| Credential::new(user.as_str(), pass.as_str()))
            })
            .enumerate()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
