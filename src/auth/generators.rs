use async_trait::async_trait;
use uuid::Uuid;

/// Trait for generating usernames
#[async_trait]
pub trait UsernameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Trait for generating user ids
#[async_trait]
pub trait UserIdGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based username generator
pub struct PetNameUsernameGenerator;

impl PetNameUsernameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameUsernameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsernameGenerator for PetNameUsernameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

/// UUID v4 user id generator
pub struct UuidUserIdGenerator;

impl UuidUserIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UuidUserIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserIdGenerator for UuidUserIdGenerator {
    async fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
