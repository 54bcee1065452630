use super::client;
use crate::{
    cli::globals::GlobalArgs,
    client::ResetToken,
    views::ResetPasswordForm,
};
use anyhow::Result;
use secrecy::SecretString;

pub async fn handle(
    globals: &GlobalArgs,
    reset_token: &str,
    new_password: &SecretString,
    confirm_password: &SecretString,
) -> Result<()> {
    let client = client(globals)?;
    let token = ResetToken::parse(reset_token)?;

    let form = ResetPasswordForm::new(client, token);
    form.submit(new_password, confirm_password).await?;

    Ok(())
}
