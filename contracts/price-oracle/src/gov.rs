use cosmwasm_std::{DepsMut, Event, Response};
use price_oracle_common::{merge_denoms, remove_denoms, Denom};

use crate::error::ContractError;
use crate::msg::{ProposalMsg, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::state::PARAMS;

fn validate_content(title: &str, description: &str) -> Result<(), ContractError> {
    let invalid = |reason: &str| ContractError::InvalidProposal {
        reason: reason.to_string(),
    };
    if title.trim().is_empty() {
        return Err(invalid("proposal title cannot be blank"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(invalid("proposal title is longer than max length"));
    }
    if description.trim().is_empty() {
        return Err(invalid("proposal description cannot be blank"));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(invalid("proposal description is longer than max length"));
    }
    Ok(())
}

fn require_denoms(field: &str, denoms: &[Denom]) -> Result<(), ContractError> {
    if denoms.is_empty() {
        return Err(ContractError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Apply a passed governance proposal to the stored params.
pub fn handle_proposal(deps: DepsMut, proposal: ProposalMsg) -> Result<Response, ContractError> {
    let mut params = PARAMS.load(deps.storage)?;

    let kind = match &proposal {
        ProposalMsg::AddTrackingPriceHistory {
            title,
            description,
            tracking_list,
        } => {
            validate_content(title, description)?;
            require_denoms("tracking_list", tracking_list)?;
            merge_denoms(&mut params.price_tracking_list, tracking_list);
            "add_tracking_price_history"
        }
        ProposalMsg::AddTrackingPriceHistoryWithAcceptList {
            title,
            description,
            tracking_list,
        } => {
            validate_content(title, description)?;
            require_denoms("tracking_list", tracking_list)?;
            merge_denoms(&mut params.accept_list, tracking_list);
            merge_denoms(&mut params.price_tracking_list, tracking_list);
            "add_tracking_price_history_with_accept_list"
        }
        ProposalMsg::RemoveTrackingPriceHistory {
            title,
            description,
            remove_tracking_list,
        } => {
            validate_content(title, description)?;
            require_denoms("remove_tracking_list", remove_tracking_list)?;
            remove_denoms(&mut params.price_tracking_list, remove_tracking_list);
            // history is required for a twap
            remove_denoms(&mut params.twap_tracking_list, remove_tracking_list);
            "remove_tracking_price_history"
        }
        ProposalMsg::AddTwapTrackingList {
            title,
            description,
            tracking_list,
        } => {
            validate_content(title, description)?;
            require_denoms("tracking_list", tracking_list)?;
            merge_denoms(&mut params.twap_tracking_list, tracking_list);
            "add_twap_tracking_list"
        }
        ProposalMsg::RemoveTwapTrackingList {
            title,
            description,
            remove_tracking_list,
        } => {
            validate_content(title, description)?;
            require_denoms("remove_tracking_list", remove_tracking_list)?;
            remove_denoms(&mut params.twap_tracking_list, remove_tracking_list);
            "remove_twap_tracking_list"
        }
    };

    params.validate()?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "handle_proposal")
        .add_event(
            Event::new("oracle_params_updated")
                .add_attribute("proposal", kind)
                .add_attribute("price_tracking_list", params.price_tracking_list.len().to_string())
                .add_attribute("twap_tracking_list", params.twap_tracking_list.len().to_string())
                .add_attribute("accept_list", params.accept_list.len().to_string()),
        ))
}
