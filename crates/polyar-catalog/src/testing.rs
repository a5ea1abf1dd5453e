//! In-process HTTP server standing in for the catalog and file CDN in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use reqwest::Url;

/// Serves canned responses by path until dropped.
pub struct TestServer {
    inner: Arc<Inner>,
    thread_handle: Option<JoinHandle<()>>,
}

struct Inner {
    server: tiny_http::Server,
    routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    hits: Mutex<Vec<String>>,
    shutdown: AtomicBool,
}

impl TestServer {
    /// Bind to a free localhost port and start serving on a background thread.
    ///
    /// Panics if no port can be bound; only meant for tests.
    pub fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let inner = Arc::new(Inner {
            server,
            routes: Mutex::new(HashMap::new()),
            hits: Mutex::new(Vec::new()),
            shutdown: AtomicBool::new(false),
        });

        let inner_copy = Arc::clone(&inner);
        let thread_handle = std::thread::Builder::new()
            .name("polyar_test_server".to_owned())
            .spawn(move || inner_copy.serve())
            .ok();

        Self {
            inner,
            thread_handle,
        }
    }

    /// Respond to `GET path` with `status` and `body`. Unrouted paths get 404.
    pub fn route(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.inner
            .routes
            .lock()
            .insert(path.to_string(), (status, body.into()));
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> Url {
        let addr = self
            .inner
            .server
            .server_addr()
            .to_ip()
            .expect("test server listens on IP");
        Url::parse(&format!("http://{addr}{path}")).expect("valid test url")
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.inner.hits.lock().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(thread_handle) = self.thread_handle.take() {
            self.inner.shutdown.store(true, Ordering::Release);
            self.inner.server.unblock();
            thread_handle.join().ok();
        }
    }
}

impl Inner {
    fn serve(&self) {
        loop {
            let request = self.server.recv();
            if self.shutdown.load(Ordering::Acquire) {
                return;
            }
            let Ok(request) = request else {
                continue;
            };

            let path = request.url().split('?').next().unwrap_or_default().to_string();
            self.hits.lock().push(path.clone());

            let (status, body) = self
                .routes
                .lock()
                .get(&path)
                .cloned()
                .unwrap_or((404, b"not found".to_vec()));

            let response = tiny_http::Response::from_data(body).with_status_code(status);
            request.respond(response).ok();
        }
    }
}
