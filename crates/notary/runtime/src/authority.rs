//! Grade Authority: which callers hold which notarization rank
//!
//! The administrator grants and revokes grades. Everyone else only reads
//! them. Grades never expire.

use notary_types::{Address, NotaryError, NotaryEvent, NotaryGrade, NotaryJournal, NotaryResult};
use std::collections::HashMap;
use tracing::{info, warn};

/// Grade assignments with a single administrator
#[derive(Debug, Clone)]
pub struct GradeAuthority {
    admin: Address,
    grades: HashMap<Address, NotaryGrade>,
}

impl GradeAuthority {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            grades: HashMap::new(),
        }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn is_admin(&self, caller: &Address) -> bool {
        *caller == self.admin
    }

    /// Reject unless `caller` is the administrator
    pub fn ensure_admin(&self, caller: &Address, action: &str) -> NotaryResult<()> {
        if !self.is_admin(caller) {
            warn!(caller = %caller, action = action, "Non-admin attempted privileged action");
            return Err(NotaryError::Unauthorized(format!(
                "{} may not {}",
                caller, action
            )));
        }
        Ok(())
    }

    /// Set a notary's grade. Granting `None` clears it.
    pub fn grant(
        &mut self,
        caller: &Address,
        notary: Address,
        grade: NotaryGrade,
        journal: &mut NotaryJournal,
    ) -> NotaryResult<()> {
        self.ensure_admin(caller, "grant notary grades")?;

        if grade.is_none() {
            self.revoke(caller, &notary, journal)?;
            return Ok(());
        }

        self.grades.insert(notary.clone(), grade);

        info!(notary = %notary, grade = %grade, "Notary grade granted");

        journal.log(NotaryEvent::GradeGranted {
            notary,
            grade,
            granted_by: caller.clone(),
        });

        Ok(())
    }

    /// Clear a notary's grade, returning the grade it held
    pub fn revoke(
        &mut self,
        caller: &Address,
        notary: &Address,
        journal: &mut NotaryJournal,
    ) -> NotaryResult<NotaryGrade> {
        self.ensure_admin(caller, "revoke notary grades")?;

        let previous = self.grades.remove(notary).unwrap_or_default();
        if !previous.is_none() {
            info!(notary = %notary, previous = %previous, "Notary grade revoked");

            journal.log(NotaryEvent::GradeRevoked {
                notary: notary.clone(),
                previous,
                revoked_by: caller.clone(),
            });
        }

        Ok(previous)
    }

    /// Hand administration to another caller
    pub fn transfer_admin(
        &mut self,
        caller: &Address,
        admin: Address,
        journal: &mut NotaryJournal,
    ) -> NotaryResult<()> {
        self.ensure_admin(caller, "transfer administration")?;

        let previous = std::mem::replace(&mut self.admin, admin.clone());

        info!(previous = %previous, admin = %admin, "Grade administration transferred");

        journal.log(NotaryEvent::AdminTransferred { previous, admin });
        Ok(())
    }

    pub fn grade_of(&self, notary: &Address) -> NotaryGrade {
        self.grades.get(notary).copied().unwrap_or_default()
    }

    /// Reject unless `caller` holds at least `required`
    pub fn ensure_grade(&self, caller: &Address, required: NotaryGrade) -> NotaryResult<()> {
        let held = self.grade_of(caller);
        if !held.satisfies(required) {
            warn!(
                caller = %caller,
                held = %held,
                required = %required,
                "Insufficient notary grade"
            );
            return Err(NotaryError::InsufficientGrade {
                caller: caller.clone(),
                held,
                required,
            });
        }
        Ok(())
    }

    /// Current grant holders, highest grade first
    pub fn notaries(&self) -> Vec<(Address, NotaryGrade)> {
        let mut notaries: Vec<_> = self
            .grades
            .iter()
            .map(|(addr, grade)| (addr.clone(), *grade))
            .collect();
        notaries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        notaries
    }
}
