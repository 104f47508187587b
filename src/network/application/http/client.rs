use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use tracing::{debug, warn};

use super::config::Config;
use super::encode::encode_query;
use super::error::{Error, Stage};
use super::headers::{Headers, normalize_custom};
use super::multipart::{self, Boundary, Form, InputFile};
use super::request::{Body, Request, write_request};
use super::response::{Response, read_response};
use crate::network::{Close, Connect, Remote, Timeouts};

type Observer = Box<dyn FnMut(&Response) + Send>;

/// Status line and headers of the last completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Head {
    status: String,
    headers: Headers,
}

/// An HTTP/1.1 client for a single destination.
///
/// Every request opens a fresh connection through the connector, writes the
/// request, reads the response and closes the connection again, whatever the
/// outcome. One exchange is in flight at a time; the client keeps the status
/// line and headers of the last completed exchange until the next one starts.
///
/// # Type Parameters
///
/// * `K` - The connector implementing [`Connect`]
///
/// # Examples
///
/// ```rust,no_run
/// use sockhttp::network::application::http::{Client, Form, InputFile};
///
/// # fn main() -> Result<(), sockhttp::network::application::http::Error> {
/// let mut client = Client::https("uploads.example.com")?;
/// client.set_header("Authorization", "Bearer token")?;
///
/// let png = std::fs::read("photo.png").unwrap_or_default();
/// let form = Form::new()
///     .text("caption", "sunset")
///     .file("photo", InputFile::new("photo.png", "image/png", &png));
/// let body = client.post_multipart("upload", &form)?;
///
/// assert_eq!(client.status_code(), Some(201));
/// # Ok(())
/// # }
/// ```
pub struct Client<K: Connect> {
    connector: K,
    config: Config,
    timeouts: Timeouts,
    custom_headers: Headers,
    last: Option<Head>,
    observer: Option<Observer>,
}

impl<K: Connect> fmt::Debug for Client<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("timeouts", &self.timeouts)
            .field("custom_headers", &self.custom_headers)
            .field("last", &self.last)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl Client<crate::network::tcp::TcpConnector> {
    /// A plaintext client for `host` on port 80.
    pub fn http(host: impl Into<String>) -> Result<Self, Error> {
        Self::new(crate::network::tcp::TcpConnector, host, 80)
    }
}

#[cfg(feature = "tls")]
impl Client<crate::network::tls::TlsConnector> {
    /// A TLS client for `host` on port 443, verifying against the webpki roots.
    pub fn https(host: impl Into<String>) -> Result<Self, Error> {
        Self::new(crate::network::tls::TlsConnector::new(), host, 443)
    }
}

impl<K: Connect> Client<K> {
    /// A client for `host:port` with the default user agent and timeouts.
    ///
    /// # Errors
    ///
    /// Fails like [`Config::validate`] when `host` is empty or contains
    /// whitespace or control characters.
    pub fn new(connector: K, host: impl Into<String>, port: u16) -> Result<Self, Error> {
        Self::with_config(connector, Config::new(host, port))
    }

    /// A client for `host:port` sending `user_agent`.
    pub fn with_user_agent(
        connector: K,
        host: impl Into<String>,
        port: u16,
        user_agent: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut config = Config::new(host, port);
        config.user_agent = Some(user_agent.into());
        Self::with_config(connector, config)
    }

    /// A client built from a validated [`Config`].
    pub fn with_config(connector: K, config: Config) -> Result<Self, Error> {
        config.validate()?;
        let timeouts = config.timeouts()?;
        Ok(Self {
            connector,
            config,
            timeouts,
            custom_headers: Headers::new(),
            last: None,
            observer: None,
        })
    }

    /// Destination host.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Destination port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        self.config.user_agent()
    }

    /// Timeouts handed to the connector.
    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Maximum time the connector may take to establish a connection.
    pub fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        if timeout.is_zero() {
            return Err(Error::InvalidTimeout);
        }
        self.timeouts.connect = timeout;
        Ok(())
    }

    /// Maximum time a read may wait for the server.
    pub fn set_response_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        if timeout.is_zero() {
            return Err(Error::InvalidTimeout);
        }
        self.timeouts.response = timeout;
        Ok(())
    }

    /// Send a header with every future request until it is unset.
    ///
    /// The name is trimmed and lower-cased, the value trimmed; setting a name
    /// again replaces the earlier value.
    ///
    /// # Errors
    ///
    /// * [`Error::ReservedHeader`] - `host`, `content-length`, `content-type`
    ///   or `user-agent`, in any case. Set the user agent at construction.
    /// * [`Error::InvalidHeader`] - an empty name, or a name or value that
    ///   would break the header line
    ///
    /// The custom headers are unchanged when an error is returned.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let (name, value) = normalize_custom(name, value)?;
        self.custom_headers.insert(&name, &value);
        Ok(())
    }

    /// Stop sending a custom header. Unknown names are ignored.
    pub fn unset_header(&mut self, name: &str) {
        self.custom_headers.remove(name.trim());
    }

    /// The custom headers sent with every request.
    pub fn headers(&self) -> &Headers {
        &self.custom_headers
    }

    /// Call `observer` with every response once its exchange completes.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&Response) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Remove the observer.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Status line of the last response, e.g. `HTTP/1.1 200 OK`.
    ///
    /// `None` before the first exchange and after a failed one.
    pub fn status(&self) -> Option<&str> {
        self.last.as_ref().map(|head| head.status.as_str())
    }

    /// Numeric status code of the last response.
    pub fn status_code(&self) -> Option<u16> {
        self.status().and_then(super::response::status_code)
    }

    /// Headers of the last response, names lower-cased.
    pub fn response_headers(&self) -> Option<&Headers> {
        self.last.as_ref().map(|head| &head.headers)
    }

    /// Perform one exchange and return the full response.
    ///
    /// The previous status and headers are cleared first and only replaced
    /// once the response has been read. The connection is closed on every
    /// path out of this method.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] when connecting, writing or reading fails,
    /// including timeouts. A malformed response is never an error.
    pub fn send(&mut self, request: &Request<'_>) -> Result<Response, Error> {
        self.last = None;

        let remote = Remote {
            host: &self.config.host,
            port: self.config.port,
            timeouts: self.timeouts,
        };
        let mut connection = self
            .connector
            .connect(&remote)
            .map_err(|e| Error::transport(Stage::Connect, &e))?;

        debug!(
            method = %request.method,
            host = self.config.host.as_str(),
            path = request.path,
            "sending request"
        );
        let outcome = write_request(
            &mut connection,
            request,
            &self.config.host,
            self.config.user_agent(),
            &self.custom_headers,
        )
        .and_then(|()| read_response(&mut connection));

        if let Err(e) = connection.close() {
            warn!(error = ?e, "failed to close connection");
        }

        let response = outcome?;
        debug!(
            status = response.status.as_str(),
            headers = response.headers.len(),
            body = response.body.len(),
            "received response"
        );

        self.last = Some(Head {
            status: response.status.clone(),
            headers: response.headers.clone(),
        });
        if let Some(observer) = self.observer.as_mut() {
            observer(&response);
        }
        Ok(response)
    }

    fn body_of(&mut self, request: &Request<'_>) -> Result<Vec<u8>, Error> {
        self.send(request).map(|response| response.body)
    }

    /// `GET /{path}` and return the response body.
    ///
    /// `path` has no leading slash (use `""` for the root) and must already be
    /// percent-encoded.
    pub fn get(&mut self, path: &str) -> Result<Vec<u8>, Error> {
        self.body_of(&Request::get(path))
    }

    /// `GET /{path}?{query}`; a leading `?` in `query` is accepted.
    pub fn get_with_query(&mut self, path: &str, query: &str) -> Result<Vec<u8>, Error> {
        self.body_of(&Request::get(path).with_query(query))
    }

    /// `GET` with `fields` encoded into the query string in iteration order.
    pub fn get_with_fields<I, N, V>(&mut self, path: &str, fields: I) -> Result<Vec<u8>, Error>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let query = encode_query(fields);
        self.body_of(&Request::get(path).with_query(&query))
    }

    /// `POST` with an empty url-encoded body.
    pub fn post(&mut self, path: &str) -> Result<Vec<u8>, Error> {
        self.post_raw(path, "")
    }

    /// `POST` `data` as is, labelled `application/x-www-form-urlencoded`.
    pub fn post_raw(&mut self, path: &str, data: &str) -> Result<Vec<u8>, Error> {
        self.body_of(&Request::post(path, Body::form_urlencoded(data)))
    }

    /// `POST` `fields` url-encoded in iteration order.
    pub fn post_form<I, N, V>(&mut self, path: &str, fields: I) -> Result<Vec<u8>, Error>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.body_of(&Request::post(path, Body::form_urlencoded(encode_query(fields))))
    }

    /// `POST` `form` as `multipart/form-data` under a fresh boundary.
    #[cfg(feature = "std")]
    pub fn post_multipart(&mut self, path: &str, form: &Form<'_>) -> Result<Vec<u8>, Error> {
        self.post_multipart_with(path, form, &Boundary::generate())
    }

    /// `POST` `form` as `multipart/form-data` under the given boundary.
    pub fn post_multipart_with(
        &mut self,
        path: &str,
        form: &Form<'_>,
        boundary: &Boundary,
    ) -> Result<Vec<u8>, Error> {
        let body = Body {
            content_type: Cow::Owned(boundary.content_type()),
            content: Cow::Owned(multipart::encode(boundary, form)),
        };
        self.body_of(&Request::post(path, body))
    }

    /// `POST` text `fields` plus a single file as `multipart/form-data`.
    #[cfg(feature = "std")]
    pub fn post_file<'a, I>(
        &mut self,
        path: &str,
        fields: I,
        file_field: &'a str,
        file: InputFile<'a>,
    ) -> Result<Vec<u8>, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let form = Form::new().texts(fields).file(file_field, file);
        self.post_multipart(path, &form)
    }
}
