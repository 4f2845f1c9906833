//! Contact handlers

use crate::error::ApiResult;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use contact_core::{validate_payload, Contact, ContactError, ContactPayload};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    message: &'static str,
    contact: Contact,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    count: usize,
    data: Vec<Contact>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContactResponse>)> {
    let Json(object) = body?;
    let fields = validate_payload(&ContactPayload::from_object(object))?;

    let contact = state.store.insert(&fields).await?;
    info!(
        "Created contact: id={}, contactId={}",
        contact.id, contact.contact_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Contact created successfully",
            contact,
        }),
    ))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<ContactListResponse>> {
    let data = state.store.find_all().await?;

    Ok(Json(ContactListResponse {
        count: data.len(),
        data,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Contact>> {
    let contact = state.store.find_by_id(&id).await?;
    contact
        .map(Json)
        .ok_or_else(|| ContactError::NotFound(id).into())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<ContactResponse>> {
    let Json(object) = body?;
    // Body is checked before the id so a bad body is a 400 even for absent ids
    let fields = validate_payload(&ContactPayload::from_object(object))?;

    let Some(contact) = state.store.update(&id, &fields).await? else {
        return Err(ContactError::NotFound(id).into());
    };
    info!(
        "Updated contact: id={}, contactId={}, version={}",
        contact.id, contact.contact_id, contact.version
    );

    Ok(Json(ContactResponse {
        message: "Contact updated successfully",
        contact,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let Some(contact) = state.store.delete_by_id(&id).await? else {
        return Err(ContactError::NotFound(id).into());
    };
    info!(
        "Deleted contact: id={}, contactId={}",
        contact.id, contact.contact_id
    );

    Ok(Json(MessageResponse {
        message: "Contact deleted successfully",
    }))
}
