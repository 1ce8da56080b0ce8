//! Spreedly API client
//!
//! [`Client::query`] is the single transport primitive: it resolves a path
//! against the site's base URL, attaches basic auth and returns the raw
//! status and body. Every other operation builds an XML body, checks for a
//! 2xx status and runs the response through the decoder.

use super::endpoints;
use super::requests::{self, SubscriberUpdate};
use super::types::{DurationUnits, Lookup, Provisioned};
use crate::auth::AuthConfig;
use crate::config::ClientConfig;
use crate::decode::{Value, XmlObjectifier};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RawResponse, RequestConfig};
use crate::template;
use crate::types::Method;
use tracing::{debug, info, warn};
use url::Url;

/// Client for one Spreedly site
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    base_url: Url,
    http: HttpClient,
    decoder: XmlObjectifier,
}

impl Client {
    /// Create a client from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;

        let mut http_config = HttpClientConfig::builder()
            .timeout(config.timeout())
            .max_retries(config.max_retries)
            .backoff(config.backoff, config.initial_backoff(), config.max_backoff());
        if let Some(agent) = &config.user_agent {
            http_config = http_config.user_agent(agent);
        }

        let http = HttpClient::with_auth(http_config.build(), AuthConfig::api_token(&config.token))?;
        let decoder = XmlObjectifier::new(config.decoder_config());

        debug!(base_url = %base_url, "Created Spreedly client");

        Ok(Self {
            config,
            base_url,
            http,
            decoder,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `<host>/api/<version>/<site>/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn url_for(&self, path: &str) -> Result<Url> {
        if template::has_templates(path) {
            return Err(Error::template(format!("Unrendered variable in path: {path}")));
        }
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and return the raw response
    ///
    /// `verb` is one of GET, POST, PUT or DELETE in any case. Any other
    /// value fails with [`Error::InvalidMethod`] before a request is made.
    /// The status code is not checked.
    pub async fn query(&self, path: &str, body: Option<&str>, verb: &str) -> Result<RawResponse> {
        let method: Method = verb.parse()?;
        self.query_method(method, path, body).await
    }

    /// Typed variant of [`Client::query`]
    pub async fn query_method(
        &self,
        method: Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<RawResponse> {
        let url = self.url_for(path)?;
        let mut request = RequestConfig::new();
        if let Some(body) = body {
            if !method.sends_body() {
                warn!(%method, path, "Sending a request body with a verb that normally has none");
            }
            request = request.xml(body);
        }

        debug!(%method, path, "Querying Spreedly");
        self.http.request(method, url.as_str(), request).await
    }

    /// Send a request and return the body of a 2xx response
    async fn call(&self, method: Method, path: &str, body: Option<&str>) -> Result<String> {
        self.query_method(method, path, body)
            .await?
            .into_success()
    }

    fn decode_optional(&self, body: &str) -> Result<Option<Value>> {
        if body.trim().is_empty() {
            Ok(None)
        } else {
            self.decoder.decode(body).map(Some)
        }
    }

    /// List the site's subscription plans
    pub async fn get_plans(&self) -> Result<Vec<Value>> {
        let body = self
            .call(Method::GET, endpoints::SUBSCRIPTION_PLANS, None)
            .await?;

        match self.decoder.decode(&body)? {
            Value::Array(plans) => Ok(plans),
            other => Err(Error::decode(format!(
                "expected a list of subscription plans, got {}",
                other.type_name()
            ))),
        }
    }

    /// Create a subscriber
    pub async fn create_subscriber(&self, customer_id: u64, screen_name: &str) -> Result<Value> {
        let body = requests::new_subscriber(customer_id, screen_name)?;
        let response = self
            .call(Method::POST, endpoints::SUBSCRIBERS, Some(&body))
            .await?;

        info!(customer_id, "Created subscriber");
        self.decoder.decode(&response)
    }

    /// Fetch a subscriber; a 404 is an error
    pub async fn get_subscriber(&self, customer_id: u64) -> Result<Value> {
        let path = endpoints::for_subscriber(endpoints::SUBSCRIBER, customer_id)?;
        let body = self.call(Method::GET, &path, None).await?;
        self.decoder.decode(&body)
    }

    /// Fetch a subscriber; a 404 is [`Lookup::NotFound`]
    pub async fn fetch_subscriber(&self, customer_id: u64) -> Result<Lookup> {
        let path = endpoints::for_subscriber(endpoints::SUBSCRIBER, customer_id)?;
        let response = self.query_method(Method::GET, &path, None).await?;

        if response.status == 404 {
            debug!(customer_id, "Subscriber not found");
            return Ok(Lookup::NotFound);
        }

        let body = response.into_success()?;
        Ok(Lookup::Found(self.decoder.decode(&body)?))
    }

    /// Change a subscriber's details
    pub async fn update_subscriber(&self, customer_id: u64, update: &SubscriberUpdate) -> Result<()> {
        let path = endpoints::for_subscriber(endpoints::SUBSCRIBER, customer_id)?;
        let body = update.to_xml()?;
        self.call(Method::PUT, &path, Some(&body)).await?;

        info!(customer_id, fields = update.len(), "Updated subscriber");
        Ok(())
    }

    /// Start a free trial on a plan
    pub async fn subscribe_to_free_trial(&self, customer_id: u64, plan_id: u64) -> Result<Value> {
        let path = endpoints::for_subscriber(endpoints::FREE_TRIAL, customer_id)?;
        let body = requests::subscription_plan(plan_id)?;
        let response = self.call(Method::POST, &path, Some(&body)).await?;

        info!(customer_id, plan_id, "Started free trial");
        self.decoder.decode(&response)
    }

    /// Grant a complimentary subscription
    ///
    /// Returns the decoded response body, if the service sent one.
    pub async fn create_complimentary_subscription(
        &self,
        customer_id: u64,
        quantity: u32,
        units: DurationUnits,
        feature_level: &str,
    ) -> Result<Option<Value>> {
        let path = endpoints::for_subscriber(endpoints::COMPLIMENTARY_SUBSCRIPTIONS, customer_id)?;
        let body = requests::complimentary_subscription(quantity, units, feature_level)?;
        let response = self.call(Method::POST, &path, Some(&body)).await?;

        info!(customer_id, quantity, %units, feature_level, "Granted complimentary subscription");
        self.decode_optional(&response)
    }

    /// Extend a subscriber's current subscription for free
    pub async fn create_complimentary_time_extension(
        &self,
        customer_id: u64,
        quantity: u32,
        units: DurationUnits,
    ) -> Result<Option<Value>> {
        let path =
            endpoints::for_subscriber(endpoints::COMPLIMENTARY_TIME_EXTENSIONS, customer_id)?;
        let body = requests::complimentary_time_extension(quantity, units)?;
        let response = self.call(Method::POST, &path, Some(&body)).await?;

        info!(customer_id, quantity, %units, "Granted complimentary time extension");
        self.decode_optional(&response)
    }

    /// Delete one subscriber
    ///
    /// Only runs against test sites. Elsewhere nothing is sent and `None`
    /// is returned.
    pub async fn delete_subscriber(&self, customer_id: u64) -> Result<Option<u16>> {
        if !self.config.is_test_site() {
            warn!(
                site = %self.config.site_name,
                customer_id,
                "Refusing to delete a subscriber outside a test site"
            );
            return Ok(None);
        }

        let path = endpoints::for_subscriber(endpoints::SUBSCRIBER, customer_id)?;
        let response = self.query_method(Method::DELETE, &path, None).await?;
        let status = response.status;
        response.into_success()?;

        info!(customer_id, status, "Deleted subscriber");
        Ok(Some(status))
    }

    /// Delete every subscriber on the site
    ///
    /// Only runs against test sites. Elsewhere nothing is sent and `None`
    /// is returned.
    pub async fn cleanup(&self) -> Result<Option<u16>> {
        if !self.config.is_test_site() {
            warn!(
                site = %self.config.site_name,
                "Refusing to delete all subscribers outside a test site"
            );
            return Ok(None);
        }

        let response = self
            .query_method(Method::DELETE, endpoints::SUBSCRIBERS, None)
            .await?;
        let status = response.status;
        response.into_success()?;

        info!(status, "Deleted all subscribers");
        Ok(Some(status))
    }

    /// Fetch a subscriber, creating it if the service reports 404
    pub async fn get_or_create_subscriber(
        &self,
        customer_id: u64,
        screen_name: &str,
    ) -> Result<Provisioned> {
        match self.fetch_subscriber(customer_id).await? {
            Lookup::Found(subscriber) => Ok(Provisioned::Existing(subscriber)),
            Lookup::NotFound => {
                let subscriber = self.create_subscriber(customer_id, screen_name).await?;
                Ok(Provisioned::Created(subscriber))
            }
        }
    }

    /// URL of the hosted subscribe page for a subscriber and plan
    ///
    /// `<host>/<site>/subscribers/<id>/subscribe/<plan>/<screen name>`
    pub fn signup_url(&self, customer_id: u64, plan_id: u64, screen_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.host)?;
        url.path_segments_mut()
            .map_err(|()| Error::invalid_value("host", "cannot be a base URL"))?
            .pop_if_empty()
            .push(&self.config.site_name)
            .push("subscribers")
            .push(&customer_id.to_string())
            .push("subscribe")
            .push(&plan_id.to_string())
            .push(screen_name);
        Ok(url)
    }
}
