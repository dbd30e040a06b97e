//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users {"name":"Ada","email":"ada@example.com","role":"vendor"}
//! GET    /api/v1/users
//! GET    /api/v1/users/me
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DisplayName, Email, Error, Role, User, UserDraft, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::orders::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field, parse_enum, parse_id, parse_optional_enum,
};

const USER_ID: FieldName = FieldName::new("userId");
const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const ROLE: FieldName = FieldName::new("role");

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "vendor")]
    pub role: String,
}

impl TryFrom<CreateUserBody> for UserDraft {
    type Error = Error;

    fn try_from(value: CreateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: DisplayName::new(value.name).map_err(|e| invalid_field(NAME, e))?,
            email: Email::new(value.email).map_err(|e| invalid_field(EMAIL, e))?,
            role: parse_enum(&value.role, ROLE)?,
        })
    }
}

/// Request body for `PUT /api/v1/users/{id}`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TryFrom<UpdateUserBody> for UserPatch {
    type Error = Error;

    fn try_from(value: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .map(DisplayName::new)
                .transpose()
                .map_err(|e| invalid_field(NAME, e))?,
            email: value
                .email
                .map(Email::new)
                .transpose()
                .map_err(|e| invalid_field(EMAIL, e))?,
            role: parse_optional_enum(value.role.as_deref(), ROLE)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            email: value.email().to_string(),
            role: value.role(),
            created_at: value.created_at(),
        }
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("BearerToken" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let draft = UserDraft::try_from(payload.into_inner())?;
    let user = state.users.create_user(auth.principal(), draft).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerToken" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users(auth.principal()).await?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users_query.current_user(auth.principal()).await?;
    Ok(web::Json(user.into()))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("BearerToken" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(&path, USER_ID)?;
    let user = state.users_query.get_user(auth.principal(), &id).await?;
    Ok(web::Json(user.into()))
}

/// Edit an account.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("BearerToken" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(&path, USER_ID)?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state
        .users
        .update_user(auth.principal(), &id, patch)
        .await?;
    Ok(web::Json(user.into()))
}

/// Delete an account other than the caller's own.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("BearerToken" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: UserId = parse_id(&path, USER_ID)?;
    state.users.delete_user(auth.principal(), &id).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests;
