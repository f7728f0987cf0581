use crate::domain::local_id;
use crate::storage::KeyValueStorage;

pub const USER_ID_KEY: &str = "blog-user-id";

/// Returns the pseudo-identity of this client, creating and persisting it on first use.
///
/// Meant to be called once where the application starts; the returned id is
/// then passed to whatever needs it. If storage is unusable the id is still
/// returned, it just will not survive a restart.
pub fn get_or_create_user_id(storage: &dyn KeyValueStorage) -> String {
    match storage.get(USER_ID_KEY) {
        Ok(Some(existing)) if !existing.trim().is_empty() => return existing.trim().to_string(),
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to read anonymous identity: {}", e),
    }

    let user_id = local_id("user");
    if let Err(e) = storage.set(USER_ID_KEY, &user_id) {
        tracing::warn!("Anonymous identity will not persist: {}", e);
    } else {
        tracing::info!("Created anonymous identity {}", user_id);
    }
    user_id
}
