//! The import page with the statement upload form.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

/// Display the upload form for importing an OFX statement.
///
/// The parsed transactions are rendered into `#preview` by the preview
/// endpoint so the user can review them before committing.
pub async fn get_import_page() -> Response {
    base(
        "Import",
        &[],
        &html! {
            (NavBar::new(endpoints::IMPORT_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Import transactions" }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    form
                        hx-post=(endpoints::IMPORT_PREVIEW)
                        hx-encoding="multipart/form-data"
                        hx-target="#preview"
                        hx-swap="innerHTML"
                        hx-target-error="#alert-container"
                        class="space-y-4"
                    {
                        div
                        {
                            label for="statement" class=(FORM_LABEL_STYLE) { "OFX statement file" }

                            input
                                type="file"
                                id="statement"
                                name="statement"
                                accept=".ofx,.qfx"
                                required
                                class="block w-full text-sm";
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Preview"
                            (loading_spinner())
                        }
                    }
                }

                div id="preview" {}
            }
        },
    )
    .into_response()
}
