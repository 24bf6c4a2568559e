use crate::{
    dto::auth::{GatewayRegisterRequest, LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    gateway::Gateway,
    session::{Session, SessionStore},
};

pub async fn register_user(gateway: &dyn Gateway, payload: RegisterRequest) -> AppResult<()> {
    let RegisterRequest {
        name,
        phone,
        email,
        password,
        confirm_password,
    } = payload;

    let mut missing = Vec::new();
    for (field, value) in [
        ("name", &name),
        ("phone", &phone),
        ("email", &email),
        ("password", &password),
    ] {
        if value.trim().is_empty() {
            missing.push(field);
        }
    }
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }
    if password != confirm_password {
        return Err(AppError::Validation("password confirmation does not match".into()));
    }

    let request = GatewayRegisterRequest {
        name: name.trim().to_string(),
        phone: phone.trim().to_string(),
        email: email.trim().to_string(),
        password,
        role: "buyer".to_string(),
        address: String::new(),
    };
    gateway.register(&request).await?;
    tracing::info!(email = %request.email, "buyer registered");
    Ok(())
}

/// Signs in through the gateway and opens a session for it.
pub async fn login_user(
    gateway: &dyn Gateway,
    store: &SessionStore,
    payload: LoginRequest,
) -> AppResult<Session> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let login = gateway.login(&payload).await.map_err(|err| match err.status() {
        Some(400 | 401 | 403) => AppError::Unauthorized,
        _ => AppError::Gateway(err),
    })?;

    let session = Session::from_login(login);
    store.insert(session.clone()).await?;
    tracing::info!(
        session_id = %session.id,
        role = %session.role,
        user_id = ?session.user_id,
        "session opened"
    );
    Ok(session)
}

/// Removes the session from the store. Returns whether it existed.
pub async fn logout_user(store: &SessionStore, session: &Session) -> AppResult<bool> {
    let removed = store.remove(session.id).await?.is_some();
    tracing::info!(session_id = %session.id, "session closed");
    Ok(removed)
}
