//! Query text submitted to the database gateway
//!
//! Query text is deployment data. Templates may contain a `{date}`
//! placeholder that is replaced with the report date (`YYYY-MM-DD`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Topic;

/// Placeholder substituted with the report date
pub const DATE_PLACEHOLDER: &str = "{date}";

/// SQL templates, one per source query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySet {
    /// Rows `(admitted flag, department, channel, patient type)`
    pub arrived: String,
    /// Rows `(profile label, amount)`
    pub dept_hosp: String,
    /// Rows `(department, outcome)`
    pub signout: String,
    /// Deceased patients listing
    pub deads: String,
    pub oar_arrived: String,
    pub oar_moved: String,
    pub oar_current: String,
}

impl Default for QuerySet {
    fn default() -> Self {
        Self {
            arrived: "SELECT admitted, dept, channel, patient_type FROM mm.arrived \
                      WHERE DATE(dates) = '{date}';"
                .to_string(),
            dept_hosp: "SELECT med_profile, amount FROM mm.dept_hosp WHERE DATE(dates) = '{date}';"
                .to_string(),
            signout: "SELECT sg.dept, sg.status FROM mm.signout sg WHERE DATE(dates) = '{date}';"
                .to_string(),
            deads: "SELECT pat_fio, ib_num, sex, agee, arriving_dt, state, dept, days, diag_arr, \
                    diag_dead FROM mm.deads;"
                .to_string(),
            oar_arrived: "SELECT pat_fio, ib_num, ages, dept, doc_fio, diag_start FROM mm.oar_arrived;"
                .to_string(),
            oar_moved: "SELECT pat_fio, ib_num, ages, dept, doc_fio, move_date, from_dept, \
                        diag_start FROM mm.oar_moved;"
                .to_string(),
            oar_current: "SELECT pat_fio, ib_num, ages, dept, doc_fio, days, diag_start \
                          FROM mm.oar_current;"
                .to_string(),
        }
    }
}

impl QuerySet {
    /// Templates paired with their fixture names
    #[must_use]
    pub fn named(&self) -> [(&'static str, &str); 7] {
        [
            ("arrived", self.arrived.as_str()),
            ("dept_hosp", self.dept_hosp.as_str()),
            ("signout", self.signout.as_str()),
            ("deads", self.deads.as_str()),
            ("oar_arrived", self.oar_arrived.as_str()),
            ("oar_moved", self.oar_moved.as_str()),
            ("oar_current", self.oar_current.as_str()),
        ]
    }

    /// Template for a named query
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.named()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, q)| q)
    }

    /// Template consumed by a report topic
    ///
    /// Returns `None` for topics that consume no dataset.
    #[must_use]
    pub fn for_topic(&self, topic: Topic) -> Option<&str> {
        match topic {
            Topic::IcuOccupancy => None,
            other => self.by_name(other.keyword()),
        }
    }

    /// Queries for the KIS report, in the order the topics consume them
    #[must_use]
    pub fn report_queries(&self, date: NaiveDate) -> Vec<String> {
        Topic::QUERIED
            .iter()
            .filter_map(|topic| self.for_topic(*topic))
            .map(|template| render(template, date))
            .collect()
    }

    /// Queries for the dashboard run: arrivals, discharges, intensive care
    /// arrivals and department hospitalisations
    #[must_use]
    pub fn dashboard_queries(&self, date: NaiveDate) -> Vec<String> {
        [&self.arrived, &self.signout, &self.oar_arrived, &self.dept_hosp]
            .into_iter()
            .map(|template| render(template, date))
            .collect()
    }
}

/// Substitute the report date into a template
#[must_use]
pub fn render(template: &str, date: NaiveDate) -> String {
    template.replace(DATE_PLACEHOLDER, &date.format("%Y-%m-%d").to_string())
}
