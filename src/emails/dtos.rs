use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::dtos::ACTIVATION_CODE;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendEmail {
    #[validate(email(message = "value is not a valid email address"))]
    #[schema(example = "test@gmail.com")]
    pub email: String,
    #[validate(regex(
        path = *ACTIVATION_CODE,
        message = "Activation code must be exactly 4 digits"
    ))]
    #[schema(example = "0420", pattern = "^[0-9]{4}$")]
    pub code: String,
}
