// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.

pub mod catalog;
pub mod operators;

pub use catalog::{count_user_enrolments, enrolment_instances, get_category, list_courses};
pub use operators::{
    count_operators, get_operator_by_id, get_operator_by_login, get_session_by_token,
    list_capability_grants, verify_password,
};
