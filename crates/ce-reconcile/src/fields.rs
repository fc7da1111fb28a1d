//! The DN master output fields and where each one takes its value from.

use crate::error::ReconcileError;
use crate::metrics::Metric;
use ce_core::model::{application_labels as app, dn_labels as dn};
use ce_core::schema::po;
use ce_core::{ConstantsConfig, Source};
use std::fmt;
use std::str::FromStr;

/// A value every reconciled row carries regardless of its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    LmcRoute,
    Ip1CoBuilt,
    DnRecipient,
    ProjectName,
    ContractType,
    BuildType,
    CategoryType,
    TrenchType,
}

impl Constant {
    pub fn value(self, constants: &ConstantsConfig) -> &str {
        match self {
            Constant::LmcRoute => &constants.lmc_route,
            Constant::Ip1CoBuilt => &constants.ip1_co_built,
            Constant::DnRecipient => &constants.dn_recipient,
            Constant::ProjectName => &constants.project_name,
            Constant::ContractType => &constants.contract_type,
            Constant::BuildType => &constants.build_type,
            Constant::CategoryType => &constants.category_type,
            Constant::TrenchType => &constants.trench_type,
        }
    }
}

/// How an output field is filled when nobody overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hardcoded(Constant),
    Calculated(Metric),
    /// Taken from a parser field; `source` is where the label normally lives
    Mapped { label: &'static str, source: Source },
    Blank,
}

impl Resolution {
    /// Source reported for the field when it is filled this way.
    pub fn source(self) -> Source {
        match self {
            Resolution::Hardcoded(_) => Source::Hardcoded,
            Resolution::Calculated(_) => Source::Calculated,
            Resolution::Mapped { source, .. } => source,
            Resolution::Blank => Source::Blank,
        }
    }
}

macro_rules! output_fields {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A DN master column, in display order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OutputField {
            $($variant),*
        }

        impl OutputField {
            pub const ALL: &'static [OutputField] = &[$(OutputField::$variant),*];

            /// Persisted column name.
            pub fn name(self) -> &'static str {
                match self {
                    $(OutputField::$variant => $name),*
                }
            }
        }
    };
}

output_fields! {
    SrNo => "sr_no",
    RouteType => "route_type",
    LmcRoute => "lmc_route",
    Ip1CoBuilt => "ip1_co_built",
    DnRecipient => "dn_recipient",
    ProjectName => "project_name",
    RouteIdSiteId => "route_id / site_id",
    Uid => "uid",
    ContractType => "contract_type",
    BuildType => "build_type",
    CategoryType => "category_type",
    SurveyId => "survey_id",
    PoNumber => "po_number",
    PoLength => "po_length",
    ParentRoute => "parent_route",
    CeRouteLmcId => "ce_route_lmc_id",
    RouteLmcSectionId => "route_lmc_section_id",
    RouteLmcSubsectionId => "route_lmc_subsection_id",
    ApplicationNumber => "application_number",
    ApplicationLengthMtr => "application_length_mtr",
    ApplicationDate => "application_date",
    FromLocation => "from_location",
    ToLocation => "to_location",
    Authority => "authority",
    Ward => "ward",
    DnNumber => "dn_number",
    DnLengthMtr => "dn_length_mtr",
    DnReceivedDate => "dn_received_date",
    TrenchType => "trench_type",
    OtLength => "ot_length",
    HddLength => "hdd_length",
    NoOfPits => "no_of_pits",
    PitRiRate => "pit_ri_rate",
    Surface => "surface",
    RiRateGoRs => "ri_rate_go_rs",
    DnRiAmount => "dn_ri_amount",
    MultiplyingFactor => "multiplying_factor",
    GroundRent => "ground_rent",
    AdministrativeCharge => "administrative_charge",
    SupervisionCharges => "supervision_charges",
    ChamberFee => "chamber_fee",
    Gst => "gst",
    RiBudgetAmountPerMeter => "ri_budget_amount_per_meter",
    ProjectedBudgetRiAmountDn => "projected_budget_ri_amount_dn",
    ActualTotalNonRefundable => "actual_total_non_refundable",
    NonRefundableAmountPerMtr => "non_refundable_amount_per_mtr",
    NonRefundableSavingsPerMtr => "non_refundable_savings_per_mtr",
    Deposit => "deposit",
    TotalDnAmount => "total_dn_amount",
    NewRevisedDnNumber => "new_revised_dn_number",
    NewRevisedDnAgainst => "new_revised_dn_against",
    InternalApprovalStart => "internal_approval_start",
    InternalApprovalEnd => "internal_approval_end",
    TicketRaisedDate => "ticket_raised_date",
    DnPaymentDate => "dn_payment_date",
    TatDays => "tat_days",
    CivilCompletionDate => "civil_completion_date",
}

impl OutputField {
    pub fn resolution(self) -> Resolution {
        use OutputField::*;
        use Resolution::{Blank, Calculated, Hardcoded};

        let from_po = |label| Resolution::Mapped { label, source: Source::Po };
        let from_app = |label| Resolution::Mapped { label, source: Source::Application };
        let from_dn = |label| Resolution::Mapped { label, source: Source::Dn };

        match self {
            LmcRoute => Hardcoded(Constant::LmcRoute),
            Ip1CoBuilt => Hardcoded(Constant::Ip1CoBuilt),
            DnRecipient => Hardcoded(Constant::DnRecipient),
            ProjectName => Hardcoded(Constant::ProjectName),
            ContractType => Hardcoded(Constant::ContractType),
            BuildType => Hardcoded(Constant::BuildType),
            CategoryType => Hardcoded(Constant::CategoryType),
            TrenchType => Hardcoded(Constant::TrenchType),

            RiBudgetAmountPerMeter => Calculated(Metric::RiBudgetAmountPerMeter),
            ProjectedBudgetRiAmountDn => Calculated(Metric::ProjectedBudgetRiAmountDn),
            ActualTotalNonRefundable => Calculated(Metric::ActualTotalNonRefundable),
            NonRefundableAmountPerMtr => Calculated(Metric::NonRefundableAmountPerMtr),
            NonRefundableSavingsPerMtr => Calculated(Metric::NonRefundableSavingsPerMtr),
            TotalDnAmount => Calculated(Metric::TotalDnAmount),

            RouteType => from_po(po::CATEGORY),
            RouteIdSiteId => from_po(po::SITE_ID),
            Uid => from_po(po::UID),
            PoNumber => from_po(po::PO_NO),
            PoLength => from_po(po::PO_LENGTH),
            ParentRoute => from_po(po::PARENT_ROUTE),

            ApplicationNumber => from_app(app::NUMBER),
            ApplicationLengthMtr => from_app(app::LENGTH),
            ApplicationDate => from_app(app::DATE),
            FromLocation => from_app(app::FROM),
            ToLocation => from_app(app::TO),
            Authority => from_app(app::AUTHORITY),
            Ward => from_app(app::WARD),

            DnNumber => from_dn(dn::REFERENCE),
            DnLengthMtr => from_dn(dn::SECTION_LENGTH),
            DnReceivedDate => from_dn(dn::DATE),
            OtLength => from_dn(dn::SECTION_LENGTH),
            Surface => from_dn(dn::ROAD_TYPES),
            RiRateGoRs => from_dn(dn::RATE),
            DnRiAmount => from_dn(dn::RI_AMOUNT),
            MultiplyingFactor => from_dn(dn::MULTIPLICATION_FACTOR),
            GroundRent => from_dn(dn::GROUND_RENT),
            AdministrativeCharge => from_dn(dn::ADMINISTRATIVE_CHARGE),
            SupervisionCharges => from_dn(dn::SUPERVISION_CHARGES),
            ChamberFee => from_dn(dn::CHAMBER_FEE),
            Gst => from_dn(dn::GST_AMOUNT),
            Deposit => from_dn(dn::SD_AMOUNT),

            SrNo | SurveyId | CeRouteLmcId | RouteLmcSectionId | RouteLmcSubsectionId
            | HddLength | NoOfPits | PitRiRate => Blank,
            NewRevisedDnNumber | NewRevisedDnAgainst | InternalApprovalStart
            | InternalApprovalEnd | TicketRaisedDate | DnPaymentDate | TatDays
            | CivilCompletionDate => Blank,
        }
    }

    /// Fields filled in by hand after the DN is processed.
    pub fn is_manual(self) -> bool {
        use OutputField::*;
        matches!(
            self,
            NewRevisedDnNumber
                | NewRevisedDnAgainst
                | InternalApprovalStart
                | InternalApprovalEnd
                | TicketRaisedDate
                | DnPaymentDate
                | TatDays
                | CivilCompletionDate
        )
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputField {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OutputField::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ReconcileError::UnknownField(wanted.to_string()))
    }
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
