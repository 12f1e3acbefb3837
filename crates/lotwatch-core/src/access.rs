//! Access policy: which requester classes may park in which lots.

use lotwatch_types::{LotDefinition, LotSummary, PermitClass, RequesterClass};

/// Whether a requester of class `requester` may use a lot with `permit`.
///
/// | permit | Student | Staff | Visitor |
/// |---|---|---|---|
/// | Open | yes | yes | yes |
/// | StudentOrStaff | yes | yes | no |
/// | StudentOnly | yes | no | no |
/// | StaffOnly | no | yes | no |
pub const fn can_use(permit: PermitClass, requester: RequesterClass) -> bool {
    match permit {
        PermitClass::Open => true,
        PermitClass::StudentOrStaff => {
            matches!(requester, RequesterClass::Student | RequesterClass::Staff)
        }
        PermitClass::StudentOnly => matches!(requester, RequesterClass::Student),
        PermitClass::StaffOnly => matches!(requester, RequesterClass::Staff),
    }
}

/// Anything that carries a lot's permit class.
pub trait Permitted {
    /// The permit class of the underlying lot.
    fn permit(&self) -> PermitClass;
}

impl Permitted for LotDefinition {
    fn permit(&self) -> PermitClass {
        Self::permit(self)
    }
}

impl Permitted for LotSummary {
    fn permit(&self) -> PermitClass {
        self.permit_type
    }
}

/// Lots `requester` may use, in the order given.
///
/// The input order is the priority order, so the first element of the
/// result is the top recommendation.
pub fn recommended<T: Permitted>(requester: RequesterClass, lots: &[T]) -> Vec<&T> {
    lots.iter()
        .filter(|lot| can_use(lot.permit(), requester))
        .collect()
}
