/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - access: AccessValidator (秘密鍵と検証器を Arc で共有)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use crate::middleware::auth::AccessValidator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub access: AccessValidator,
}

impl AppState {
    pub fn new(access: AccessValidator) -> Self {
        Self { access }
    }
}
