use std::fmt;
use std::str::FromStr;

/// Organization-level and business-level role. Stored as lowercase text;
/// parsed at the edges so handlers reject unknown values before SQL does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPlan {
    Free,
    Basic,
    Pro,
}

impl BillingPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPlan::Free => "free",
            BillingPlan::Basic => "basic",
            BillingPlan::Pro => "pro",
        }
    }
}

impl FromStr for BillingPlan {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(BillingPlan::Free),
            "basic" => Ok(BillingPlan::Basic),
            "pro" => Ok(BillingPlan::Pro),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BillingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_and_displays() {
        for s in ["owner", "manager", "staff"] {
            let role: Role = s.parse().unwrap();
            assert_eq!(role.as_str(), s);
        }
    }

    #[test]
    fn role_rejects_unknown_values() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Owner".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn billing_plan_parses() {
        assert_eq!("pro".parse::<BillingPlan>().unwrap(), BillingPlan::Pro);
        assert!("enterprise".parse::<BillingPlan>().is_err());
    }
}
