//! Declarative metric catalog.
//!
//! Each report endpoint is one row of this table: which ERP table to read,
//! which date column the period applies to, what to aggregate, and which
//! scalar filters narrow the rows. The query builder and aggregator are shared
//! by every metric.

use serde::Serialize;

/// ERP schema holding every reporting table.
pub const ERP_SCHEMA: &str = "bethadba";

/// Column holding the ERP company code on every reporting table.
pub const COMPANY_COLUMN: &str = "codi_emp";

/// Column holding the transaction-nature code on entries/exits tables.
pub const NATURE_COLUMN: &str = "codi_nat";

/// Payroll events that are informative only and never part of the payroll total.
const INFORMATIVE_EVENTS: &[i32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Overtime payroll events (50%, 60%, 70%, 100%, night overtime).
const OVERTIME_EVENTS: &[i32] = &[150, 151, 152, 153, 154];

/// Absence type "working" in `foafastamentos`, which is not an absence.
const ABSENCE_WORKING: &[i32] = &[1];

/// Monthly payroll calculation type.
const MONTHLY_PAYROLL: i32 = 11;

const ICMS_FILTERS: &[Filter] = &[Filter::Eq("codi_imp", 1)];
const PIS_FILTERS: &[Filter] = &[Filter::Eq("codi_imp", 4)];
const COFINS_FILTERS: &[Filter] = &[Filter::Eq("codi_imp", 5)];

const PAYROLL_FILTERS: &[Filter] = &[
    Filter::Eq("rateio", 0),
    Filter::Eq("tipo_process", MONTHLY_PAYROLL),
    Filter::NotIn("i_eventos", INFORMATIVE_EVENTS),
];
const OVERTIME_FILTERS: &[Filter] = &[
    Filter::Eq("rateio", 0),
    Filter::In("i_eventos", OVERTIME_EVENTS),
];
const NO_FILTERS: &[Filter] = &[];
const NO_APPORTIONMENT: &[Filter] = &[Filter::Eq("rateio", 0)];
const ABSENCE_FILTERS: &[Filter] = &[Filter::NotIn("i_afastamentos", ABSENCE_WORKING)];

/// Whether a metric reports money or a headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Monetary total, rounded to 2 places in responses.
    Amount,
    /// Integer count.
    Count,
}

/// What a metric aggregates per company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueExpr {
    /// `SUM(column)`.
    Sum(&'static str),
    /// `COUNT(*)`.
    Count,
    /// `COUNT(DISTINCT column)`.
    CountDistinct(&'static str),
}

impl ValueExpr {
    /// Renders the SQL aggregate expression.
    #[must_use]
    pub fn to_sql(self) -> String {
        match self {
            Self::Sum(column) => format!("SUM({column})"),
            Self::Count => "COUNT(*)".to_string(),
            Self::CountDistinct(column) => format!("COUNT(DISTINCT {column})"),
        }
    }
}

/// A scalar filter whose values are bound as parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// `column = ?`.
    Eq(&'static str, i32),
    /// `column IN (?, ...)`.
    In(&'static str, &'static [i32]),
    /// `column NOT IN (?, ...)`.
    NotIn(&'static str, &'static [i32]),
}

/// The declarative description of one report metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    /// Table name inside [`ERP_SCHEMA`].
    pub table: &'static str,
    /// Date column the period predicate applies to.
    pub date_column: &'static str,
    /// Aggregate expression.
    pub value: ValueExpr,
    /// Static scalar filters.
    pub filters: &'static [Filter],
    /// Whether rows are partitioned by the nature exclusion set.
    pub uses_exclusions: bool,
    /// Money or headcount.
    pub kind: MetricKind,
}

impl MetricSpec {
    /// Fully qualified table name.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        format!("{ERP_SCHEMA}.{}", self.table)
    }
}

macro_rules! metrics {
    ($($variant:ident => $slug:literal),+ $(,)?) => {
        /// A report metric exposed as `POST /<slug>`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Metric {
            $(
                #[doc = concat!("`", $slug, "`")]
                #[serde(rename = $slug)]
                $variant,
            )+
        }

        impl Metric {
            /// Every metric, in route registration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Route slug.
            #[must_use]
            pub const fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)+
                }
            }
        }
    };
}

metrics! {
    SomaEntradas => "somaEntradas",
    SomaSaidas => "somaSaidas",
    Icms => "icms",
    Pis => "pis",
    Cofins => "cofins",
    ValorFolha => "valorFolha",
    Irrf => "irrf",
    Inss => "inss",
    Fgts => "fgts",
    Demitidos => "demitidos",
    Admitidos => "admitidos",
    Funcionarios => "funcionarios",
    Ferias => "ferias",
    Afastados => "afastados",
    Avisos => "avisos",
    Experiencia => "experiencia",
    HorasExtras => "horasExtras",
}

impl Metric {
    /// Returns the catalog entry for this metric.
    #[must_use]
    pub const fn spec(self) -> MetricSpec {
        match self {
            Self::SomaEntradas => MetricSpec {
                table: "efentradas",
                date_column: "dent_ent",
                value: ValueExpr::Sum("vprod_ent"),
                filters: NO_FILTERS,
                uses_exclusions: true,
                kind: MetricKind::Amount,
            },
            Self::SomaSaidas => MetricSpec {
                table: "efsaidas",
                date_column: "dsai_sai",
                value: ValueExpr::Sum("vprod_sai"),
                filters: NO_FILTERS,
                uses_exclusions: true,
                kind: MetricKind::Amount,
            },
            Self::Icms => tax(ICMS_FILTERS),
            Self::Pis => tax(PIS_FILTERS),
            Self::Cofins => tax(COFINS_FILTERS),
            Self::ValorFolha => MetricSpec {
                table: "fomovtoserv",
                date_column: "data",
                value: ValueExpr::Sum("valor_cal"),
                filters: PAYROLL_FILTERS,
                uses_exclusions: false,
                kind: MetricKind::Amount,
            },
            Self::HorasExtras => MetricSpec {
                table: "fomovtoserv",
                date_column: "data",
                value: ValueExpr::Sum("valor_cal"),
                filters: OVERTIME_FILTERS,
                uses_exclusions: false,
                kind: MetricKind::Amount,
            },
            Self::Irrf => payroll_base("valor_irrf"),
            Self::Inss => payroll_base("valor_inss"),
            Self::Fgts => payroll_base("valor_fgts"),
            Self::Funcionarios => MetricSpec {
                table: "fobasesserv",
                date_column: "competencia",
                value: ValueExpr::CountDistinct("i_empregados"),
                filters: NO_APPORTIONMENT,
                uses_exclusions: false,
                kind: MetricKind::Count,
            },
            Self::Admitidos => headcount("foempregados", "admissao", NO_FILTERS),
            Self::Demitidos => headcount("forescisoes", "demissao", NO_FILTERS),
            Self::Ferias => headcount("foferias_gozo", "inicio_gozo", NO_FILTERS),
            Self::Afastados => headcount("foafastamentos", "data_real", ABSENCE_FILTERS),
            Self::Avisos => headcount("foavisoprevio", "data_aviso", NO_FILTERS),
            Self::Experiencia => headcount("foempregados", "vencimento_experiencia", NO_FILTERS),
        }
    }
}

const fn tax(filters: &'static [Filter]) -> MetricSpec {
    MetricSpec {
        table: "efsdoimp",
        date_column: "data_sim",
        value: ValueExpr::Sum("sdev_sim"),
        filters,
        uses_exclusions: false,
        kind: MetricKind::Amount,
    }
}

const fn payroll_base(column: &'static str) -> MetricSpec {
    MetricSpec {
        table: "fobasesserv",
        date_column: "competencia",
        value: ValueExpr::Sum(column),
        filters: NO_APPORTIONMENT,
        uses_exclusions: false,
        kind: MetricKind::Amount,
    }
}

const fn headcount(
    table: &'static str,
    date_column: &'static str,
    filters: &'static [Filter],
) -> MetricSpec {
    MetricSpec {
        table,
        date_column,
        value: ValueExpr::Count,
        filters,
        uses_exclusions: false,
        kind: MetricKind::Count,
    }
}
