//! A fake Digital Loggers switch served over plain HTTP on a loopback port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::challenge_response;

const CHALLENGE: &str = "4e2Jq7Xc";

struct FakeOutlet {
    name: String,
    on: bool,
    jammed: bool,
}

struct FakePduState {
    userid: String,
    password: String,
    basic_auth: bool,
    outlets: Vec<FakeOutlet>,
    logins: usize,
    commands: Vec<String>,
}

type SharedState = Arc<Mutex<FakePduState>>;

pub struct FakePdu {
    address: SocketAddr,
    state: SharedState,
}

impl FakePdu {
    /// A switch with challenge/response login.
    pub async fn start(userid: &str, password: &str, outlets: &[(&str, bool)]) -> Self {
        Self::spawn(userid, password, outlets, false).await
    }

    /// A switch from the older firmware line that only speaks basic auth.
    pub async fn start_basic(userid: &str, password: &str, outlets: &[(&str, bool)]) -> Self {
        Self::spawn(userid, password, outlets, true).await
    }

    async fn spawn(userid: &str, password: &str, outlets: &[(&str, bool)], basic_auth: bool) -> Self {
        let state = Arc::new(Mutex::new(FakePduState {
            userid: userid.to_string(),
            password: password.to_string(),
            basic_auth,
            outlets: outlets
                .iter()
                .map(|(name, on)| FakeOutlet { name: name.to_string(), on: *on, jammed: false })
                .collect(),
            logins: 0,
            commands: vec![],
        }));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Could not bind fake switch");
        let address = listener.local_addr().expect("Fake switch has no address");

        let router = fake_pdu_router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { address, state }
    }

    pub fn address(&self) -> String {
        self.address.to_string()
    }

    pub fn logins(&self) -> usize {
        self.state.lock().unwrap().logins
    }

    /// Outlet paths requested so far, e.g. `/outlet?1=OFF`.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn outlet_state(&self, outlet: u32) -> Option<bool> {
        let state = self.state.lock().unwrap();
        outlet_index(&state, outlet).map(|index| state.outlets[index].on)
    }

    /// Makes the outlet ignore switch commands.
    pub fn jam_outlet(&self, outlet: u32) {
        let mut state = self.state.lock().unwrap();
        if let Some(index) = outlet_index(&state, outlet) {
            state.outlets[index].jammed = true;
        }
    }
}

fn fake_pdu_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(login_page_or_status))
        .route("/login.tcl", post(login))
        .route("/index.htm", get(status))
        .route("/outlet", get(switch_outlet))
        .with_state(state)
}

fn outlet_index(state: &FakePduState, outlet: u32) -> Option<usize> {
    let index = (outlet as usize).checked_sub(1)?;
    (index < state.outlets.len()).then_some(index)
}

/// Basic-auth switches turn away any request without credentials.
fn unauthorized(state: &FakePduState, headers: &HeaderMap) -> Option<Response> {
    if !state.basic_auth || headers.contains_key(header::AUTHORIZATION) {
        return None;
    }
    let response = (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Power Controller\"")],
        Html("<html>Unauthorized</html>"),
    );
    Some(response.into_response())
}

async fn login_page_or_status(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }
    if state.basic_auth {
        Html(status_page(&state)).into_response()
    } else {
        Html(login_page()).into_response()
    }
}

async fn login(State(state): State<SharedState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().unwrap();
    let expected = challenge_response(CHALLENGE, &state.userid, &state.password);

    let accepted = form.get("Username") == Some(&state.userid) && form.get("Password") == Some(&expected);
    if !accepted {
        return Html(login_page()).into_response();
    }
    state.logins += 1;
    Html(status_page(&state)).into_response()
}

async fn status(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }
    Html(status_page(&state)).into_response()
}

async fn switch_outlet(
    State(state): State<SharedState>,
    headers: HeaderMap,
    uri: Uri,
    Query(command): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }
    state.commands.push(uri.to_string());

    for (outlet, action) in command {
        let index = outlet.parse::<u32>().ok().and_then(|outlet| outlet_index(&state, outlet));
        if let Some(index) = index {
            if !state.outlets[index].jammed {
                state.outlets[index].on = action == "ON";
            }
        }
    }
    Html(status_page(&state)).into_response()
}

fn login_page() -> String {
    format!(
        "<html><body><form action=\"/login.tcl\" method=\"post\">\n\
         <input type=\"hidden\" name=\"Challenge\" value=\"{}\">\n\
         <input type=\"text\" name=\"Username\"><input type=\"password\" name=\"Password\">\n\
         </form></body></html>",
        CHALLENGE
    )
}

fn status_page(state: &FakePduState) -> String {
    let mut page = String::from(
        "<html><body><table>\n<tr bgcolor=\"#DDDDDD\"><th>#</th><th>Name</th><th>State</th></tr>\n",
    );
    for (index, outlet) in state.outlets.iter().enumerate() {
        let (color, label) = if outlet.on { ("green", "ON") } else { ("red", "OFF") };
        page.push_str(&format!(
            "<tr bgcolor=\"#F4F4F4\"><td align=center>{}</td>\n<td>{}</td><td><b><font color={}>{}</font></b></td></tr>\n",
            index + 1,
            outlet.name,
            color,
            label
        ));
    }
    page.push_str("</table></body></html>");
    page
}
