//! Client adapter for EFA (Elektronische Fahrplanauskunft) journey planners.
//!
//! Builds stop-finder, departure-monitor and trip requests against an EFA
//! endpoint and parses the XML replies into typed stations, timetables and
//! journeys. A JSON web front-end sits on top.

pub mod domain;
pub mod efa;
pub mod session;
pub mod web;
pub mod xml;
