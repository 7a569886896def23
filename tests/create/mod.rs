//! Step definitions, fixtures, and scenarios for `create.feature`.

mod bdd_steps;
mod scenarios;
mod test_helpers;
