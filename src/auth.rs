//! Authorization Gate.
//!
//! Every operation starts here. The gate classifies the requester from the
//! session's `requesting_account.owner` field and enforces "who may act on
//! whom", emitting `AccessDeniedException` (carrying the constructed ARNs of
//! both parties in its message) for every authorization failure that isn't
//! itself a missing-target or quota case (those are `NoSuchEntity` /
//! `LimitExceeded` / `DeleteConflict`, decided by the caller after the gate
//! passes).

use crate::arn::user_arn;
use crate::error::{IamError, Result};
use crate::model::{Account, AccountOwner};
use crate::session::Session;

fn denied(session: &Session, target_arn: &str, reason: &str) -> IamError {
    let requester_arn = user_arn(
        session.root_id(),
        session.requesting_account.iam_path.as_str(),
        session.name(),
    );
    IamError::access_denied(format!(
        "requester {requester_arn} may not {reason} on {target_arn}"
    ))
}

fn target_arn(account: &Account) -> String {
    user_arn(account.root_id(), &account.iam_path, &account.name)
}

/// `CreateUser`, `DeleteUser`, `ListUsers`: root only, no existing target to check.
pub fn require_root(session: &Session, action: &str) -> Result<()> {
    if session.is_root() {
        Ok(())
    } else {
        Err(denied(session, &target_arn(&session.requesting_account), action))
    }
}

/// `GetUser`, `UpdateUser`: root only, and the target must be an IAM user
/// owned by the requester. A non-root requester is always `AccessDenied`
/// (B4); a root requester naming a user it does not own is `NoSuchEntity`,
/// not `AccessDenied` — the target is simply not visible to this root.
pub fn authorize_owned_user(session: &Session, target: &Account, action: &str) -> Result<()> {
    if !session.is_root() {
        return Err(denied(session, &target_arn(target), action));
    }
    match target.owner_kind() {
        AccountOwner::IamUser { owner_id } if owner_id == session.id() => Ok(()),
        _ => Err(IamError::no_such_entity(format!("user:{}", target.name))),
    }
}

/// Resolves which username a `CreateAccessKey`/`UpdateAccessKey`/
/// `DeleteAccessKey`/`ListAccessKeys` call targets: a root must name the
/// user explicitly; a user with no explicit username (or their own) acts on
/// themselves; a user naming someone else is denied
/// before any file is even read.
pub fn effective_target_username<'a>(
    session: &'a Session,
    requested: Option<&'a str>,
) -> Result<&'a str> {
    match (session.is_root(), requested) {
        (true, Some(name)) => Ok(name),
        (true, None) => Err(IamError::no_such_entity("username")),
        (false, None) => Ok(session.name()),
        (false, Some(name)) if name == session.name() => Ok(name),
        (false, Some(_)) => Err(denied(
            session,
            &target_arn(&session.requesting_account),
            "act on another user's access keys",
        )),
    }
}

/// `UpdateAccessKey`/`DeleteAccessKey`, resolved via the access-key symlink:
/// both parties must share the same root, and the target cannot itself be a
/// root account record. An unknown access-key identifier never reaches this
/// point (the symlink resolution itself fails first), so every mismatch
/// here is a genuine cross-tenant attempt and stays `AccessDenied`.
pub fn authorize_same_root(session: &Session, target: &Account, action: &str) -> Result<()> {
    if target.is_root_account() {
        return Err(denied(session, &target_arn(target), action));
    }
    if target.root_id() != session.root_id() {
        return Err(denied(session, &target_arn(target), action));
    }
    if !session.is_root() && target.name != session.name() {
        return Err(denied(session, &target_arn(target), action));
    }
    Ok(())
}

/// `CreateAccessKey`/`ListAccessKeys`, resolved via the target's username: a
/// cross-root target is `NoSuchEntity`, not `AccessDenied` — a root caller
/// naming another root's user can't distinguish "doesn't exist" from "not
/// mine" (§8 scenario 3: `R2.create_access_key(Bob) -> NoSuchEntity`). A
/// non-root caller can only ever reach this with itself as the target
/// (`effective_target_username` already rejected anyone else), so the
/// root-account and cross-tenant checks below only ever fire for root
/// callers.
pub fn authorize_same_root_by_name(
    session: &Session,
    target: &Account,
    action: &str,
) -> Result<()> {
    if target.is_root_account() {
        return Err(denied(session, &target_arn(target), action));
    }
    if target.root_id() != session.root_id() {
        return Err(IamError::no_such_entity(format!("user:{}", target.name)));
    }
    if !session.is_root() && target.name != session.name() {
        return Err(denied(session, &target_arn(target), action));
    }
    Ok(())
}

/// `GetAccessKeyLastUsed`: any authenticated caller whose root matches the
/// access key's root.
pub fn authorize_same_root_read(session: &Session, target: &Account) -> Result<()> {
    if target.root_id() != session.root_id() {
        return Err(denied(session, &target_arn(target), "read"));
    }
    Ok(())
}
