// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTML rendering of the report pages.
//!
//! Report rows arrive as localisation keys and typed fragments; this is the
//! only place they become markup. Every string goes through maud, so course
//! and category names are escaped.

use enrolall::{
    ActionFragment, Column, InstanceName, REPORT_COLUMNS, ReportPage, ReportRow, ReportTable,
};
use enrolall_domain::Category;
use maud::{DOCTYPE, Markup, html};
use rust_i18n::t;
use url::form_urlencoded::Serializer;

/// Path the report is served under.
pub const REPORT_PATH: &str = "/enrol/instancesAll";

/// Location of an icon image.
fn pix_url(pix: &str) -> String {
    format!("/pix/{pix}.svg")
}

/// Looks up a localised string by a key known only at run time.
fn localised(key: &str, lang: &str) -> String {
    t!(key, locale = lang).into_owned()
}

/// Wraps a page body in the site header and footer.
fn layout(title: &str, lang: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                header {
                    h1 { (title) }
                }
                main {
                    (body)
                }
                footer {
                    a href="/" { (t!("site_title", locale = lang)) }
                }
            }
        }
    }
}

/// Relative link that reruns the report for one category.
fn category_link(category: &Category) -> String {
    let query: String = Serializer::new(String::new())
        .append_pair("id", &category.id.to_string())
        .finish();
    format!("?{query}")
}

fn cell_style(column: &Column) -> String {
    format!("text-align: {}", column.align.as_css())
}

fn column_header(column: &Column, lang: &str) -> String {
    column
        .keys
        .iter()
        .map(|key| localised(key, lang))
        .collect::<Vec<String>>()
        .join(" / ")
}

fn instance_name(name: &InstanceName, lang: &str) -> String {
    match name {
        InstanceName::Custom(name) => name.clone(),
        InstanceName::Plugin { key, detail } => {
            let plugin_name: String = localised(key, lang);
            match detail {
                Some(detail) => format!("{plugin_name} ({detail})"),
                None => plugin_name,
            }
        }
    }
}

fn action(fragment: &ActionFragment, lang: &str) -> Markup {
    match fragment {
        ActionFragment::Icon { pix, label } => {
            let label: String = localised(label, lang);
            html! {
                img.iconsmall src=(pix_url(pix)) alt=(label) title=(label);
            }
        }
        ActionFragment::Link { href, pix, label } => {
            let label: String = localised(label, lang);
            html! {
                a href=(href) title=(label) {
                    img.iconsmall src=(pix_url(pix)) alt=(label);
                }
            }
        }
        ActionFragment::Image { pix } => html! {
            img.iconsmall src=(pix_url(pix)) alt="";
        },
    }
}

fn report_row(row: &ReportRow, lang: &str) -> Markup {
    let [name_column, users_column, toggle_column, edit_column] = &REPORT_COLUMNS;
    let name: String = instance_name(&row.name, lang);

    html! {
        tr {
            td style=(cell_style(name_column)) {
                @if row.dimmed {
                    span.dimmed_text { (name) }
                } @else {
                    (name)
                }
            }
            td style=(cell_style(users_column)) { (row.users) }
            td style=(cell_style(toggle_column)) {
                @for fragment in &row.actions {
                    (action(fragment, lang))
                }
            }
            td style=(cell_style(edit_column)) {
                a href=(row.edit_link) target="edit" { (t!("edit", locale = lang)) }
            }
        }
    }
}

/// Renders the enrolment methods table of one course.
#[must_use]
pub fn report_table(table: &ReportTable, lang: &str) -> Markup {
    html! {
        table.generaltable width="100%" {
            thead {
                tr {
                    @for column in table.columns() {
                        th style=(cell_style(column)) { (column_header(column, lang)) }
                    }
                }
            }
            tbody {
                @for row in &table.rows {
                    (report_row(row, lang))
                }
            }
        }
    }
}

/// Renders a complete report page.
///
/// The index lists one link per category; the drill-down shows a back link,
/// the category heading and every course table of the category.
#[must_use]
pub fn report_page(page: &ReportPage, lang: &str) -> Markup {
    let body: Markup = match page {
        ReportPage::Index { categories } => html! {
            h2 { (t!("categories", locale = lang)) " : " }
            @for category in categories {
                span {
                    " * "
                    a href=(category_link(category)) { (category.name) }
                }
                br;
            }
        },
        ReportPage::DrillDown { category, courses } => html! {
            a href="?id=" { (t!("back", locale = lang)) }
            h2 { (t!("category", locale = lang)) " : " (category.name) }
            div.generalbox.boxaligncenter.boxwidthnormal {
                @for (course_name, table) in courses {
                    h3 { (course_name) }
                    (report_table(table, lang))
                }
            }
            hr;
        },
    };
    layout(&localised("page_title", lang), lang, &body)
}

/// Renders the landing page.
#[must_use]
pub fn home_page(lang: &str) -> Markup {
    let body: Markup = html! {
        p {
            a href=(REPORT_PATH) { (t!("open_report", locale = lang)) }
        }
    };
    layout(&localised("site_title", lang), lang, &body)
}

/// Renders an error page for a failed report request.
#[must_use]
pub fn error_page(message: &str, lang: &str) -> Markup {
    let body: Markup = html! {
        p.errormessage { (message) }
        p {
            a href="/" { (t!("continue", locale = lang)) }
        }
    };
    layout(&localised("error", lang), lang, &body)
}
