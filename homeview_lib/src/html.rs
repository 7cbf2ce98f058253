use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// A message box that is shown above the main content
pub enum FrontendMessage {
    Warning(String),
    Error(String),
}

impl FrontendMessage {

    pub fn extract_message(&self) -> &str {
        match self {
            FrontendMessage::Warning(msg) => msg,
            FrontendMessage::Error(msg) => msg,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html += match self {
            Self::Warning(_) => "<div class=\"MessageWarning\">",
            Self::Error(_) => "<div class=\"MessageError\">",
        };
        html += &html_escape::encode_text(self.extract_message()).replace("\n", "<br>");
        html += "</div>";
        html
    }
}


/// The login entry of the navigation bar
pub enum NavbarLogin {

    /// Visitor is not logged in, link to the login url
    Login(String),

    /// Visitor is logged in, link to the logout url
    Logout(String),
}


/// Frame of a complete HTML page.
///
/// The body is assembled by route handlers, everything around it
/// (head, navigation, messages, footer) is added when converting into a response.
pub struct HtmlTemplate {
    title: String,
    status: StatusCode,
    html_body: String,
    css_files: Vec<& 'static str>,
    messages: Vec<FrontendMessage>,
    navbar_login: Option<NavbarLogin>,
}

impl HtmlTemplate {

    /// Create a new, empty HTML template
    pub fn new(title: &str) -> Self {
        HtmlTemplate {
            title: title.to_string(),
            status: StatusCode::OK,
            html_body: "".to_string(),
            css_files: Vec::new(),
            messages: Vec::new(),
            navbar_login: None,
        }
    }

    /// The status code of the response (default 200)
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Adding a string to the HTML body
    pub fn push_body(&mut self, body: &str) {
        self.html_body += body;
    }

    /// request a CSS file to be additionally loaded
    pub fn include_css(&mut self, file_path: & 'static str) {
        self.css_files.push(file_path)
    }

    pub fn set_navbar_login(&mut self, navbar_login: NavbarLogin) {
        self.navbar_login = Some(navbar_login);
    }

    pub fn message_warning(&mut self, message: String) {
        self.messages.push(FrontendMessage::Warning(message));
    }

    pub fn message_error(&mut self, message: String) {
        self.messages.push(FrontendMessage::Error(message));
    }

    /// Assemble the complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html += "<!DOCTYPE html>\n";
        html += "<html>\n";
        html += "  <head>\n";
        html += "    <meta charset=\"UTF-8\">\n";
        html += "    <meta name=\"color-scheme\" content=\"dark light\">\n";
        html += "    <title>";
        html += &html_escape::encode_text(&self.title);
        html += "</title>\n";
        html += "    <link rel=\"icon\" href=\"/rsc/img/favicon.svg\" sizes=\"any\" type=\"image/svg+xml\">\n";
        html += "    <link rel=\"stylesheet\" href=\"/rsc/css/main.css\">\n";
        for css_file in &self.css_files {
            html += "    <link rel=\"stylesheet\" href=\"";
            html += css_file;
            html += "\">\n";
        }
        html += "  </head>\n";

        // html body
        html += "  <body><div>\n";

        // navigation
        html += "    <nav>\n";
        html += "      <div id=\"NavbarMenu\">\n";
        html += "          <div class=\"NavbarNoDrop\">\n";
        html += "              <a href=\"/\" class=\"active\">Home</a>\n";
        html += "          </div>\n";
        match &self.navbar_login {
            Some(NavbarLogin::Login(url)) => {
                html += "          <div class=\"NavbarLogin\">\n";
                html += "              <a class=\"enter\" href=\"";
                html += &html_escape::encode_double_quoted_attribute(url);
                html += "\">Login</a>\n";
                html += "          </div>\n";
            },
            Some(NavbarLogin::Logout(url)) => {
                html += "          <div class=\"NavbarLogin\">\n";
                html += "              <a class=\"leave\" href=\"";
                html += &html_escape::encode_double_quoted_attribute(url);
                html += "\">Logout</a>\n";
                html += "          </div>\n";
            },
            None => {},
        }
        html += "      </div>\n";
        html += "    </nav>\n";

        // messages
        html += "    <messages>";
        for message in &self.messages {
            html += &message.to_html();
        }
        html += "</messages>\n";

        // content
        html += "    <main>\n";
        html += &self.html_body;
        html += "    </main>\n";

        // footer
        html.push_str("    <footer>\n");
        html.push_str("    </footer>\n");

        // html finish
        html.push_str("  </div></body>\n");
        html.push_str("</html>\n");
        html
    }
}

impl IntoResponse for HtmlTemplate {

    fn into_response(self) -> Response {
        (self.status, Html(self.to_html())).into_response()
    }
}
