use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, IdPath, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
        ValidationErrorResponse,
    },
};
use utoipa::OpenApi;

use crate::auth::{CurrentUser, UserState};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, TokenResponse, UpdateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the user endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        login,
        protected_user,
        list_users,
        create_user,
        get_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, LoginRequest, TokenResponse),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            UnauthorizedResponse,
            ValidationErrorResponse,
            InternalServerErrorResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = TAG, description = "User accounts and token login")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl utoipa::Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// User routes, unprefixed. The app nests them under `/users`.
pub fn router<R: UserRepository + 'static>(service: UserService<R>, tokens: JwtAuth) -> Router {
    let state = UserState::new(service, tokens);

    Router::new()
        .route("/token", post(login))
        .route("/protected-user", get(protected_user))
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(state)
}

/// Exchange username and password for an access token
#[utoipa::path(
    post,
    path = "/token",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<UserState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let user = match state.service.authenticate(&input.username, &input.password).await {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, UserError::InvalidCredentials) {
                AuditEvent::failure("user.login")
                    .actor(input.username.as_str())
                    .from_headers(&headers)
                    .log();
            }
            return Err(err);
        }
    };

    let token = state.tokens.issue_for_subject(&user.username)?;

    AuditEvent::success("user.login")
        .actor(user.username.as_str())
        .resource(format!("user:{}", user.id))
        .from_headers(&headers)
        .log();

    Ok(Json(TokenResponse::bearer(token)))
}

/// The user the bearer token belongs to
#[utoipa::path(
    get,
    path = "/protected-user",
    tag = TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn protected_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(state): State<UserState<R>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = state.service.list_users().await?;
    Ok(Json(users))
}

/// Register a user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(state): State<UserState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.create_user(input).await?;

    AuditEvent::success("user.create")
        .resource(format!("user:{}", user.id))
        .from_headers(&headers)
        .log();

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(state): State<UserState<R>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(id).await?;
    Ok(Json(user))
}

/// Update the supplied fields of a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(state): State<UserState<R>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let password_changed = input.password.as_value().is_some();
    let user = state.service.update_user(id, input).await?;

    AuditEvent::success("user.update")
        .resource(format!("user:{}", id))
        .from_headers(&headers)
        .details(serde_json::json!({ "password_changed": password_changed }))
        .log();

    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(state): State<UserState<R>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.delete_user(id).await?;

    AuditEvent::success("user.delete")
        .resource(format!("user:{}", id))
        .from_headers(&headers)
        .log();

    Ok(Json(user))
}
