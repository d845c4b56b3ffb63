//! GET /: the interactive prediction page.
//!
//! The sidebar is rendered from the same input table the API validates
//! against. The output block stays hidden until the operator presses the
//! predict button, which posts the slider values to `/api/v1/predict`.

use axum::response::Html;

use crate::services::inputs::{InputField, INPUT_FIELDS};

const PAGE_TEMPLATE: &str = include_str!("../../static/index.html");

pub const COMPETITION_URL: &str = "https://www.kaggle.com/competitions/playground-series-s5e3";
pub const REPOSITORY_URL: &str = "https://github.com/jairgs/kaggle-rainfall-prediction";

fn slider(field: &InputField) -> String {
    format!(
        concat!(
            "      <label for=\"{name}\">{label} <output for=\"{name}\">{default}</output></label>\n",
            "      <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" ",
            "step=\"{step}\" value=\"{default}\" data-integer=\"{integer}\">\n",
        ),
        name = field.name,
        label = field.label,
        min = field.min,
        max = field.max,
        step = field.step,
        default = field.default,
        integer = field.integer,
    )
}

/// Render the page with one slider per input field.
pub fn render_page() -> String {
    let sidebar: String = INPUT_FIELDS.iter().map(slider).collect();
    PAGE_TEMPLATE
        .replace("{{sidebar}}", sidebar.trim_end())
        .replace("{{competition_url}}", COMPETITION_URL)
        .replace("{{repository_url}}", REPOSITORY_URL)
}

pub async fn index() -> Html<String> {
    Html(render_page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_one_slider_per_field() {
        let page = render_page();
        assert_eq!(page.matches("type=\"range\"").count(), 11);
        assert!(page.contains(
            "id=\"day\" name=\"day\" min=\"1\" max=\"365\" step=\"1\" value=\"1\""
        ));
        assert!(page.contains(
            "id=\"pressure\" name=\"pressure\" min=\"990\" max=\"1050\" step=\"0.1\" value=\"1010\""
        ));
        assert!(page.contains("Enter Weather Data"));
    }

    #[test]
    fn test_page_links_and_placeholders() {
        let page = render_page();
        assert!(page.contains("🌧️ Rainfall Prediction"));
        assert!(page.contains(COMPETITION_URL));
        assert!(page.contains(REPOSITORY_URL));
        assert!(page.contains("Predict Rainfall Probability"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_result_hidden_until_prediction() {
        let page = render_page();
        assert!(page.contains("<section id=\"result\" hidden>"));
        assert!(page.contains("/api/v1/predict"));
    }

    #[tokio::test]
    async fn test_index_handler() {
        let Html(body) = index().await;
        assert!(body.starts_with("<!DOCTYPE html>"));
    }
}
