use homeview_lib::html::{HtmlTemplate, NavbarLogin};
use crate::app_state::AppState;

pub mod home;
pub mod logout;

/// An empty html page with the site title and the login/logout entry in the navigation bar
pub fn html_template(app_state: &AppState, logged_in: bool) -> HtmlTemplate {
    let mut html = HtmlTemplate::new(&app_state.config().general.title);
    if logged_in {
        html.set_navbar_login(NavbarLogin::Logout("/logout".to_string()));
    } else {
        html.set_navbar_login(NavbarLogin::Login(app_state.config().identity.login_url.clone()));
    }
    html
}
