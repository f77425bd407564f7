use anyhow::{Result, anyhow};

/// Contacts only need a usable recipient. The format itself is left to the
/// gateway, which receives the phone verbatim.
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.trim().is_empty() {
        return Err(anyhow!("Phone cannot be empty"));
    }

    Ok(())
}

pub fn validate_image_url(image_url: &str) -> Result<()> {
    if image_url.trim().is_empty() {
        return Err(anyhow!("Image URL cannot be empty"));
    }

    Ok(())
}
