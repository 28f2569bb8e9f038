//! Variables command implementation

use clap::Args;

use crate::causality::Tier;
use crate::config::VenuesConfig;
use crate::panel::Venue;

#[derive(Args, Debug)]
pub struct VariablesArgs {
    /// Also print the input column names of each variable
    #[arg(long)]
    pub columns: bool,
}

impl VariablesArgs {
    pub fn execute(&self, venues: &VenuesConfig) -> anyhow::Result<()> {
        print!("{}", self.listing(venues));
        Ok(())
    }

    fn listing(&self, venues: &VenuesConfig) -> String {
        let mut out = String::new();
        for tier in Tier::ALL {
            out.push_str(&format!("{}\n  {}\n", tier.title(), tier.question()));
            for variable in tier.variables() {
                if self.columns {
                    out.push_str(&format!(
                        "    {:<18} {}, {}\n",
                        variable,
                        venues.column(Venue::A, variable),
                        venues.column(Venue::B, variable)
                    ));
                } else {
                    out.push_str(&format!("    {}\n", variable));
                }
            }
        }
        out
    }
}
