//! Backend paths consumed by the session core.

pub const TOKEN_LOGIN: &str = "/api/token/login/";
pub const TOKEN_REFRESH: &str = "/api/token/refresh/";
pub const TOKEN_LOGOUT: &str = "/api/token/logout/";
pub const USER_ME: &str = "/api/user/me/";
pub const HEALTH: &str = "/api/health/";
