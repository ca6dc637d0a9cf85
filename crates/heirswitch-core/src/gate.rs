//! Access gate for switch operations

use heirswitch_types::{Address, Result, Role, Switch, SwitchError};

pub fn require_owner(caller: &Address, record: &Switch) -> Result<()> {
    if caller != &record.owner {
        return Err(SwitchError::Unauthorized {
            caller: *caller,
            role: Role::Owner,
        });
    }
    Ok(())
}

pub fn require_beneficiary(caller: &Address, record: &Switch) -> Result<()> {
    if caller != &record.beneficiary {
        return Err(SwitchError::Unauthorized {
            caller: *caller,
            role: Role::Beneficiary,
        });
    }
    Ok(())
}

/// The custody account cannot escrow into itself
pub fn validate_owner(owner: &Address, custody: &Address) -> Result<()> {
    if owner == custody {
        return Err(SwitchError::InvalidOwner {
            reason: "custody account cannot own a switch".to_string(),
        });
    }
    Ok(())
}

/// A beneficiary must be a real account distinct from the owner and custody
pub fn validate_beneficiary(
    owner: &Address,
    beneficiary: &Address,
    custody: &Address,
) -> Result<()> {
    if beneficiary.is_zero() {
        return Err(SwitchError::InvalidBeneficiary {
            reason: "zero address".to_string(),
        });
    }
    if beneficiary == owner {
        return Err(SwitchError::InvalidBeneficiary {
            reason: "owner cannot be their own beneficiary".to_string(),
        });
    }
    if beneficiary == custody {
        return Err(SwitchError::InvalidBeneficiary {
            reason: "custody account cannot inherit".to_string(),
        });
    }
    Ok(())
}
