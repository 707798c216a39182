use std::sync::Arc;

use studio_common::{NewUser, Role, UserRecord, UserStatus};
use studio_directory::{
    DirectoryConfig, EventCalendar, LocalStoreConfig, RemoteStoreConfig, UserDirectory,
};

use crate::config::{ApiConfig, Config, LoggingConfig, SessionConfig};
use crate::AppState;

pub const TEST_SECRET: &str = "test-session-secret";

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        directory: DirectoryConfig {
            remote: RemoteStoreConfig::default(),
            local: LocalStoreConfig {
                path: ":memory:".to_string(),
            },
            password_cost: 4,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            ttl_minutes: 60,
        },
        bootstrap_admin: None,
    }
}

/// State backed by an in-memory local store and an empty calendar.
pub fn create_test_state() -> Arc<AppState> {
    let config = test_config();
    let directory = UserDirectory::from_config(&config.directory).unwrap();
    Arc::new(AppState::new(
        config,
        Arc::new(directory),
        Arc::new(EventCalendar::new()),
    ))
}

/// Create a user directly in the directory and sign a session for it.
pub async fn seed_user(state: &AppState, name: &str, email: &str, password: &str, role: Role) -> (UserRecord, String) {
    let user = state
        .directory
        .create(NewUser::new(name, email, password, role, UserStatus::Active))
        .await
        .unwrap();
    let token = state.sessions.issue(&user).unwrap();
    (user, token)
}
