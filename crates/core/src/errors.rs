use crate::models::{ErrorBody, Response};

/// A server-reported failure, classified by its numeric code.
///
/// Every variant keeps the full response that carried the error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseError {
    #[error("Invalid request body: {message}")]
    InvalidRequestBody {
        message: String,
        response: Box<Response>,
    },
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        response: Box<Response>,
    },
    #[error("Server side error: {message}")]
    ServerSideError {
        message: String,
        response: Box<Response>,
    },
    #[error("Unknown error (code {code}): {message}")]
    UnknownError {
        code: i64,
        message: String,
        response: Box<Response>,
    },
}

impl ResponseError {
    pub const INVALID_REQUEST_BODY: i64 = 1;
    pub const INVALID_ARGUMENT: i64 = 2;
    pub const SERVER_SIDE_ERROR: i64 = 3;

    pub(crate) fn classify(body: ErrorBody, response: Response) -> Self {
        let ErrorBody { code, message } = body;
        let response = Box::new(response);
        match code {
            Self::INVALID_REQUEST_BODY => ResponseError::InvalidRequestBody { message, response },
            Self::INVALID_ARGUMENT => ResponseError::InvalidArgument { message, response },
            Self::SERVER_SIDE_ERROR => ResponseError::ServerSideError { message, response },
            code => ResponseError::UnknownError {
                code,
                message,
                response,
            },
        }
    }

    /// The numeric code the server sent.
    pub fn code(&self) -> i64 {
        match self {
            ResponseError::InvalidRequestBody { .. } => Self::INVALID_REQUEST_BODY,
            ResponseError::InvalidArgument { .. } => Self::INVALID_ARGUMENT,
            ResponseError::ServerSideError { .. } => Self::SERVER_SIDE_ERROR,
            ResponseError::UnknownError { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ResponseError::InvalidRequestBody { message, .. }
            | ResponseError::InvalidArgument { message, .. }
            | ResponseError::ServerSideError { message, .. }
            | ResponseError::UnknownError { message, .. } => message,
        }
    }

    /// The response that carried this error.
    pub fn response(&self) -> &Response {
        match self {
            ResponseError::InvalidRequestBody { response, .. }
            | ResponseError::InvalidArgument { response, .. }
            | ResponseError::ServerSideError { response, .. }
            | ResponseError::UnknownError { response, .. } => response,
        }
    }
}
