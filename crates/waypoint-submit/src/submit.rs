//! Submit pipeline

use url::form_urlencoded;
use waypoint_engine::Engine;
use waypoint_model::{resolve_url, Destination, HistoryMode, NavigateOptions};

use crate::client::{HttpClient, SubmitRequest, SubmitResponse};
use crate::form::{FormMethod, FormSubmission};
use crate::Result;

/// Submit a form and reconcile the response with the navigation engine.
///
/// A redirect response with a Location header becomes a replace-navigation
/// to that location; any other response leaves the navigation state alone.
/// Either way the caller gets the resulting entry paired with the response.
pub async fn submit(
    engine: &Engine,
    client: &dyn HttpClient,
    form: FormSubmission,
) -> Result<(Destination, SubmitResponse)> {
    let current = engine.current_entry();
    let origin = url::Url::parse(&engine.origin().ascii_serialization())
        .map_err(|err| waypoint_model::ModelError::InvalidUrl(err.to_string()))?;

    let mut url = match &form.action {
        Some(action) => resolve_url(&origin, engine.base(), action)?,
        None => current.url.clone(),
    };

    let encoded = encode_fields(&form.fields);
    let request = match form.method {
        FormMethod::Get => {
            if !encoded.is_empty() {
                url.set_query(Some(&encoded));
            }
            SubmitRequest {
                method: FormMethod::Get,
                url,
                body: None,
            }
        }
        FormMethod::Post => SubmitRequest {
            method: FormMethod::Post,
            url,
            body: Some(encoded),
        },
    };

    tracing::debug!(form = %form.name, method = %form.method, url = %request.url, "submitting form");
    let response = client.send(request).await?;

    if response.is_redirect() {
        if let Some(location) = response.location() {
            let options = NavigateOptions {
                history: HistoryMode::Replace,
                state: None,
                info: form.info,
            };
            let destination = engine.navigate(location, options).await?;
            return Ok((destination, response));
        }
    }

    Ok((engine.current_entry(), response))
}

fn encode_fields(fields: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}
