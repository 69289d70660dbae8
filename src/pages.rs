// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages (sign-in and home) with their toasts.

use crate::error::AppError;
use crate::signin::Toast;
use axum::response::Html;
use minijinja::{context, Environment, UndefinedBehavior};

/// Compiled page templates. `.html` names turn on auto-escaping.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("login.html", include_str!("../templates/login.html"))?;
        env.add_template("home.html", include_str!("../templates/home.html"))?;
        Ok(Self { env })
    }

    /// The sign-in page: the Google button plus any toasts.
    pub fn login(&self, toasts: &[Toast]) -> Result<Html<String>, AppError> {
        let html = self
            .env
            .get_template("login.html")?
            .render(context! { toasts })?;
        Ok(Html(html))
    }

    pub fn home(&self, toasts: &[Toast], signed_in: bool) -> Result<Html<String>, AppError> {
        let html = self
            .env
            .get_template("home.html")?
            .render(context! { toasts, signed_in })?;
        Ok(Html(html))
    }
}
