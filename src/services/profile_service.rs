use crate::{
    dto::{orders::DeliveryInfo, profile::NewAddressRequest},
    error::{AppError, AppResult},
    gateway::Gateway,
    models::SavedAddress,
    session::Session,
};

pub async fn list_addresses(
    gateway: &dyn Gateway,
    session: &Session,
) -> AppResult<Vec<SavedAddress>> {
    Ok(gateway.addresses(&session.token).await?)
}

pub async fn add_address(
    gateway: &dyn Gateway,
    session: &Session,
    payload: NewAddressRequest,
) -> AppResult<()> {
    let request = NewAddressRequest {
        title: payload.title.trim().to_string(),
        address: payload.address.trim().to_string(),
        phone: payload.phone.trim().to_string(),
    };
    let missing: Vec<&'static str> = [
        ("title", &request.title),
        ("address", &request.address),
        ("phone", &request.phone),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    gateway.add_address(&session.token, &request).await?;
    tracing::info!(session_id = %session.id, title = %request.title, "address saved");
    Ok(())
}

/// Fills blank `phone` and `address` from the chosen saved address. Values the
/// shopper typed win.
pub async fn resolve_delivery(
    gateway: &dyn Gateway,
    session: &Session,
    mut delivery: DeliveryInfo,
) -> AppResult<DeliveryInfo> {
    let Some(address_id) = delivery.address_id else {
        return Ok(delivery);
    };
    let saved = gateway
        .addresses(&session.token)
        .await?
        .into_iter()
        .find(|a| a.id == address_id)
        .ok_or(AppError::NotFound)?;

    if delivery.address.trim().is_empty() {
        delivery.address = saved.address;
    }
    if delivery.phone.trim().is_empty() {
        delivery.phone = saved.phone;
    }
    Ok(delivery)
}
