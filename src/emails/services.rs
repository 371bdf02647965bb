use crate::{errors::AppError, mailing::Mailer};

use super::dtos::SendEmail;

pub async fn send_activation_email(mailer: &Mailer, input: SendEmail) -> Result<(), AppError> {
    mailer.send_activation_code(&input.email, &input.code).await
}
