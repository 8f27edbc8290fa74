// src/process/schema.rs

/// How a raw cell is typed when the registry CSV is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Free text, kept raw (dates included).
    Text,
    /// Whole numbers, e.g. the floor.
    Integer,
    /// Coordinates.
    Float,
    /// `true`/`false` tokens; anything else stays text.
    Flag,
}

/// Every column the pipeline knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Interior,
    Floor,
    FreeAccess,
    AddressNumber,
    AddressStreet,
    Owner,
    InstallDate,
    LastMaintenance,
    OccasionalClosure,
    AvailableHours,
    AvailableDays,
    BatteryExpiry,
    AdultElectrodeExpiry,
    ChildElectrodeExpiry,
    Latitude,
    ChildElectrode,
    Longitude,
    SerialNumber,
    Referent,
    Phone,
    /// Derived by the framer from the two address components.
    Address,
}

/// Allow-list of source columns, in registry order.
pub const SOURCE_FIELDS: &[Field] = &[
    Field::Name,
    Field::Interior,
    Field::Floor,
    Field::FreeAccess,
    Field::AddressNumber,
    Field::AddressStreet,
    Field::Owner,
    Field::InstallDate,
    Field::LastMaintenance,
    Field::OccasionalClosure,
    Field::AvailableHours,
    Field::AvailableDays,
    Field::BatteryExpiry,
    Field::AdultElectrodeExpiry,
    Field::ChildElectrodeExpiry,
    Field::Latitude,
    Field::ChildElectrode,
    Field::Longitude,
    Field::SerialNumber,
    Field::Referent,
    Field::Phone,
];

/// Columns holding calendar dates once sanitized.
pub const DATE_FIELDS: &[Field] = &[
    Field::BatteryExpiry,
    Field::InstallDate,
    Field::AdultElectrodeExpiry,
    Field::ChildElectrodeExpiry,
    Field::LastMaintenance,
];

/// Yes/no columns stored as tri-state booleans.
pub const FLAG_FIELDS: &[Field] = &[Field::FreeAccess, Field::ChildElectrode];

impl Field {
    /// Header used by the registry CSV.
    pub fn source_name(self) -> &'static str {
        match self {
            Field::Name => "nom",
            Field::Interior => "acc",
            Field::Floor => "acc_etg",
            Field::FreeAccess => "acc_lib",
            Field::AddressNumber => "adr_num",
            Field::AddressStreet => "adr_voie",
            Field::Owner => "appartenan",
            Field::InstallDate => "date_insta",
            Field::LastMaintenance => "dermnt",
            Field::OccasionalClosure => "disp_compl",
            Field::AvailableHours => "disp_h",
            Field::AvailableDays => "disp_j",
            Field::BatteryExpiry => "dtpr_bat",
            Field::AdultElectrodeExpiry => "dtpr_lcad",
            Field::ChildElectrodeExpiry => "dtpr_lcped",
            Field::Latitude => "lat_coor1",
            Field::ChildElectrode => "lc_ped",
            Field::Longitude => "long_coor1",
            Field::SerialNumber => "num_serie",
            Field::Referent => "ref",
            Field::Phone => "tel1",
            Field::Address => "address",
        }
    }

    /// Human-readable header of the cleaned table.
    pub fn display_name(self) -> &'static str {
        match self {
            Field::Name => "Nom",
            Field::Interior => "Interieur",
            Field::Floor => "Etage",
            Field::FreeAccess => "Acces_libre",
            Field::AddressNumber => "adr_num",
            Field::AddressStreet => "adr_voie",
            Field::Owner => "Propriétaire",
            Field::InstallDate => "Date_instal",
            Field::LastMaintenance => "Derniere_maintenance",
            Field::OccasionalClosure => "Fermeture_occasionel",
            Field::AvailableHours => "Heure_disp",
            Field::AvailableDays => "Jour_disp",
            Field::BatteryExpiry => "Date_péremption_batterie",
            Field::AdultElectrodeExpiry => "Date_péremption_elec_adulte",
            Field::ChildElectrodeExpiry => "Date_péremption_elec_pédiatrique",
            Field::Latitude => "Latitude",
            Field::ChildElectrode => "Electrode_enfant",
            Field::Longitude => "Longitude",
            Field::SerialNumber => "Num_serie",
            Field::Referent => "Référent",
            Field::Phone => "Tel",
            Field::Address => "address",
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Field::Floor => Kind::Integer,
            Field::Latitude | Field::Longitude => Kind::Float,
            Field::FreeAccess | Field::ChildElectrode => Kind::Flag,
            _ => Kind::Text,
        }
    }

    pub fn from_source_name(name: &str) -> Option<Self> {
        SOURCE_FIELDS
            .iter()
            .copied()
            .find(|f| f.source_name() == name.trim())
    }
}
