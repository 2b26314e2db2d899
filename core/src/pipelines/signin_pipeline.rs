// core/src/pipelines/signin_pipeline.rs

use crate::error::{StoreError, StoreResult};
use crate::flow::{ContextData, Pipeline, PipelineControl};
use crate::pipelines::contexts::SigninCtxData;
use tracing::{event, info, warn, Level};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Email and Password are required";

pub fn build_signin_pipeline() -> StoreResult<Pipeline<SigninCtxData>> {
  let mut signin_p = Pipeline::<SigninCtxData>::new(
    "signin",
    &[
      ("validate_signin_input", false),
      ("request_session_token", false),
      ("persist_session", false),
    ],
  );

  signin_p.on_root("validate_signin_input", validate_signin_input)?;
  signin_p.on_root("request_session_token", request_session_token)?;
  signin_p.on_root("persist_session", persist_session)?;
  Ok(signin_p)
}

// Rejected before any network call.
async fn validate_signin_input(ctx_data: ContextData<SigninCtxData>) -> StoreResult<PipelineControl> {
  let (email_is_empty, password_is_empty) = {
    let guard = ctx_data.read();
    (guard.email.is_empty(), guard.password.is_empty())
  };

  if email_is_empty || password_is_empty {
    warn!("Sign-in attempted without email or password.");
    return Err(StoreError::Validation(MISSING_CREDENTIALS_MESSAGE.to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn request_session_token(ctx_data: ContextData<SigninCtxData>) -> StoreResult<PipelineControl> {
  let (api, email, password) = {
    let guard = ctx_data.read();
    (guard.api.clone(), guard.email.clone(), guard.password.clone())
  };

  event!(Level::DEBUG, email = %email, "Requesting session token.");
  let reply = api.login(&email, &password).await?;

  {
    let mut guard = ctx_data.write();
    guard.user_email_from_response = reply.user_email().map(str::to_string);
    guard.issued_token = Some(reply.token);
  }
  Ok(PipelineControl::Continue)
}

// The identity falls back to the submitted email when the reply carries none.
async fn persist_session(ctx_data: ContextData<SigninCtxData>) -> StoreResult<PipelineControl> {
  let (session, token, identity) = {
    let guard = ctx_data.read();
    let identity = guard
      .user_email_from_response
      .clone()
      .unwrap_or_else(|| guard.email.clone());
    (guard.session.clone(), guard.issued_token.clone(), identity)
  };
  let token = token.ok_or_else(|| StoreError::Internal("sign-in run lost its issued token".to_string()))?;

  session.sign_in(token, identity.clone())?;
  info!(user_email = %identity, "Signed in.");
  Ok(PipelineControl::Continue)
}
