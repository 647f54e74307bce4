#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{
    FAKE_PASSWORD, FakeBackend, TAKEN_EMAIL, TAKEN_EMAIL_MESSAGE, WRONG_PASSWORD_MESSAGE,
    fake_profile,
};
pub(crate) use form::{
    assert_form_input, assert_form_submit_button, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect};

use crate::{auth::Session, backend::Token};

use backend::FAKE_TOKEN;

/// A session holding the token [FakeBackend] accepts.
pub(crate) fn fake_session() -> Session {
    Session {
        token: Token::new(FAKE_TOKEN),
        user_name: "Ana".to_owned(),
        profile: fake_profile(),
    }
}
