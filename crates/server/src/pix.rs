// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report icons, embedded at compile time.
//!
//! Served under `/pix/t/<name>.svg`, the URLs the report views link to.

use axum::{
    extract::Path,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Route of the embedded toggle and action icons.
pub const PIX_ROUTE: &str = "/pix/t/{file}";

const HIDE: &str = include_str!("../pix/t/hide.svg");
const SHOW: &str = include_str!("../pix/t/show.svg");
const EDIT: &str = include_str!("../pix/t/edit.svg");
const ENROL_USERS: &str = include_str!("../pix/t/enrolusers.svg");

/// Looks up an embedded icon by its `t/` name.
#[must_use]
pub fn icon(name: &str) -> Option<&'static str> {
    match name {
        "hide" => Some(HIDE),
        "show" => Some(SHOW),
        "edit" => Some(EDIT),
        "enrolusers" => Some(ENROL_USERS),
        _ => None,
    }
}

/// Handler for GET `/pix/t/{file}`.
pub async fn handle_icon(Path(file): Path<String>) -> Response {
    match file.strip_suffix(".svg").and_then(icon) {
        Some(svg) => (
            [
                (CONTENT_TYPE, "image/svg+xml"),
                (CACHE_CONTROL, "public, max-age=86400"),
            ],
            svg,
        )
            .into_response(),
        None => {
            debug!(file = %file, "Unknown icon requested");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
