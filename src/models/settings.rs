//! Branding and contact configuration shown by the front end

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::TransitionType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SliderItem {
    pub id: String,
    pub url: String,
    pub title: String,
    pub transition: TransitionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    #[validate(length(min = 1, message = "Application name is required"))]
    pub app_name: String,
    pub logo_url: String,
    pub contact_phone: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    pub contact_website: String,
    #[serde(rename = "socialFB")]
    pub social_fb: String,
    #[serde(rename = "socialIG")]
    pub social_ig: String,
    #[serde(rename = "socialYT")]
    pub social_yt: String,
    pub secondary_logo_url: String,
    #[serde(default)]
    pub sliders: Vec<SliderItem>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            app_name: "SIMPANSE".to_string(),
            logo_url: "https://cdn-icons-png.flaticon.com/512/2619/2619018.png".to_string(),
            contact_phone: "082292313876".to_string(),
            contact_email: "kgtkmalut@gmail.com".to_string(),
            contact_website: "https://kgtkmalut.id".to_string(),
            social_fb: "https://facebook.com/kantorgtkmalt".to_string(),
            social_ig: "https://instagram.com/kgtk_malut".to_string(),
            social_yt: "https://youtube.com/@KGTKMalukuUtara".to_string(),
            secondary_logo_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/9/9c/Logo_of_the_Ministry_of_Education_and_Culture_of_the_Republic_of_Indonesia.svg/1200px-Logo_of_the_Ministry_of_Education_and_Culture_of_the_Republic_of_Indonesia.svg.png".to_string(),
            sliders: vec![
                SliderItem {
                    id: "s1".to_string(),
                    url: "https://images.unsplash.com/photo-1497215728101-856f4ea42174?auto=format&fit=crop&q=80&w=1920&h=700".to_string(),
                    title: "Manajemen Aset Digital".to_string(),
                    transition: TransitionType::Fade,
                },
                SliderItem {
                    id: "s2".to_string(),
                    url: "https://images.unsplash.com/photo-1554118811-1e0d58224f24?auto=format&fit=crop&q=80&w=1920&h=700".to_string(),
                    title: "Kemudahan Peminjaman".to_string(),
                    transition: TransitionType::Zoom,
                },
            ],
        }
    }
}
