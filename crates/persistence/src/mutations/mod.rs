// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.

pub mod catalog;
pub mod operators;

pub use catalog::{create_category, create_course, create_enrolment_instance, enrol_user};
pub use operators::{
    create_operator, create_session, delete_session, disable_operator, grant_capability,
    update_last_login, update_session_activity,
};
