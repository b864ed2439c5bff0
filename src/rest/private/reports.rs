//! Report and user endpoints.

use crate::error::ExchangeError;
use crate::rest::builder::{RequestBuilder, normalize_symbol, require_id};
use crate::rest::endpoints::private;
use crate::rest::private::{Report, ReportRequest, ReportType, TrailingVolume};
use crate::rest::{RequestDescriptor, RestClient};

impl RequestBuilder {
    /// `POST /reports`
    pub fn create_report(&self, report: &ReportRequest) -> Result<RequestDescriptor, ExchangeError> {
        if report.start_date >= report.end_date {
            return Err(ExchangeError::InvalidRequest(
                "report start_date must be before end_date".to_string(),
            ));
        }

        let mut report = report.clone();
        match report.report_type {
            ReportType::Fills => {
                let product_id = report.product_id.as_deref().ok_or_else(|| {
                    ExchangeError::InvalidRequest("fills reports require a product_id".to_string())
                })?;
                report.product_id = Some(normalize_symbol(product_id));
            }
            ReportType::Account if report.account_id.is_none() => {
                return Err(ExchangeError::InvalidRequest(
                    "account reports require an account_id".to_string(),
                ));
            }
            ReportType::Account => {}
        }

        RequestDescriptor::post(self.url(private::REPORTS, &[], None)?).with_json_body(&report)
    }

    /// `GET /reports/{id}`
    pub fn get_report(&self, report_id: &str) -> Result<RequestDescriptor, ExchangeError> {
        let id = require_id("report", report_id)?;
        Ok(RequestDescriptor::get(self.url(private::REPORTS, &[id], None)?))
    }

    /// `GET /users/self/trailing-volume`
    pub fn get_trailing_volume(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(private::TRAILING_VOLUME, &[], None)?))
    }
}

impl RestClient {
    /// Request generation of a report. Poll [`RestClient::get_report`] until it is ready.
    pub async fn create_report(&self, report: &ReportRequest) -> Result<Report, ExchangeError> {
        self.execute(self.requests().create_report(report)?).await
    }

    /// Get the status of a report.
    pub async fn get_report(&self, report_id: &str) -> Result<Report, ExchangeError> {
        self.execute(self.requests().get_report(report_id)?).await
    }

    /// Get the 30-day trailing volume for every traded product.
    pub async fn get_trailing_volume(&self) -> Result<Vec<TrailingVolume>, ExchangeError> {
        self.execute(self.requests().get_trailing_volume()?).await
    }
}
