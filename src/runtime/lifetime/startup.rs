use crate::ai::{AiClient, HttpAiClient, provider::platform_providers};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub ai_client: Arc<dyn AiClient>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 没有任何用户时创建默认管理员账号
pub async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用 ADMIN_PASSWORD，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: Some(UserRole::Admin),
        name: Some("Administrator".to_string()),
        avatar_url: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文：存储后端、AI 客户端与默认管理员
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let ai_client: Arc<dyn AiClient> = Arc::new(
        HttpAiClient::from_config(&config.ai).expect("Failed to build AI HTTP client"),
    );
    let providers = platform_providers(&config.ai);
    if providers.is_empty() {
        warn!("No platform AI keys configured; AI features need per-user keys");
    } else {
        info!("Platform AI keys configured for: {:?}", providers);
    }

    StartupContext { storage, ai_client }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;

    #[test]
    fn test_generated_password_length() {
        assert_eq!(generate_random_password(16).chars().count(), 16);
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_store() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        seed_admin(&storage).await;
        seed_admin(&storage).await;

        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.name, "Administrator");
    }
}
