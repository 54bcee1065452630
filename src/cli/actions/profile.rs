use super::client;
use crate::{
    cli::globals::GlobalArgs,
    client::{ClientError, ProfileData},
    views::ProfileView,
};
use anyhow::Result;

pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let view = ProfileView::new(client(globals)?);

    let profile = view.mount().await?;
    view.unmount();

    let profile = profile.ok_or(ClientError::NoSession)?;
    print!("{}", render(&profile));

    Ok(())
}

pub(crate) fn render(profile: &ProfileData) -> String {
    format!(
        "Full Name:         {}\nEmail Address:     {}\nMembership Status: {}\n",
        profile.name, profile.email, profile.membership_active
    )
}
