//! Read-only province → district directory used to resolve coordinates.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::{Error, Result};

pub const DEFAULT_PROVINCE: &str = "songkhla";
pub const DEFAULT_DISTRICT: &str = "hatyai";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct District {
    pub key: &'static str,
    pub name_th: &'static str,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Province {
    pub key: &'static str,
    pub name_th: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub districts: &'static [District],
}

impl Province {
    pub fn district(&self, key: &str) -> Option<&'static District> {
        self.districts.iter().find(|d| d.key.eq_ignore_ascii_case(key.trim()))
    }
}

/// A province/district pair after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub province_key: &'static str,
    pub district_key: &'static str,
    pub province: &'static str,
    pub district: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// False when either selector was missing or unknown and a default was used
    pub exact: bool,
}

impl ResolvedLocation {
    /// `"{district} {province}"`, the string shown under the title.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.district, self.province)
    }
}

pub fn provinces() -> &'static [Province] {
    PROVINCES
}

pub fn province(key: &str) -> Option<&'static Province> {
    PROVINCES.iter().find(|p| p.key.eq_ignore_ascii_case(key.trim()))
}

/// Strict lookup: both keys must exist.
pub fn lookup(province_key: &str, district_key: &str) -> Result<ResolvedLocation> {
    let p = province(province_key)
        .ok_or_else(|| Error::UnknownLocation(format!("province {:?}", province_key)))?;
    let d = p
        .district(district_key)
        .ok_or_else(|| Error::UnknownLocation(format!("district {:?} in {}", district_key, p.key)))?;
    Ok(resolved(p, d, true))
}

/// Lenient lookup used by every user-facing surface.
///
/// Keys are case-insensitive. A missing selector means [`DEFAULT_PROVINCE`]
/// or [`DEFAULT_DISTRICT`]; a district the province does not have falls back
/// to its first district, and an unknown province to the default location.
/// Never fails.
pub fn resolve(province_key: Option<&str>, district_key: Option<&str>) -> ResolvedLocation {
    let requested = province_key.filter(|k| !k.trim().is_empty());
    let Some(p) = province(requested.unwrap_or(DEFAULT_PROVINCE)) else {
        log::debug!("Unknown province {:?}; using default location", province_key);
        return default_location();
    };
    let given = district_key.filter(|k| !k.trim().is_empty());
    match p.district(given.unwrap_or(DEFAULT_DISTRICT)) {
        Some(d) => resolved(p, d, requested.is_some() && given.is_some()),
        None => resolved(p, &p.districts[0], false),
    }
}

pub fn default_location() -> ResolvedLocation {
    let p = province(DEFAULT_PROVINCE).unwrap_or(&PROVINCES[0]);
    let d = p.district(DEFAULT_DISTRICT).unwrap_or(&p.districts[0]);
    resolved(p, d, false)
}

fn resolved(p: &'static Province, d: &'static District, exact: bool) -> ResolvedLocation {
    ResolvedLocation {
        province_key: p.key,
        district_key: d.key,
        province: p.name_th,
        district: d.name_th,
        lat: d.lat,
        lng: d.lng,
        exact,
    }
}

/// Serialises the whole directory as
/// `{provinceKey: {nameTh, lat, lng, districts: [{key, nameTh, lat, lng}]}}`,
/// keeping table order.
pub struct Directory;

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PROVINCES.len()))?;
        for p in PROVINCES {
            map.serialize_entry(p.key, &ProvinceEntry(p))?;
        }
        map.end()
    }
}

struct ProvinceEntry(&'static Province);

impl Serialize for ProvinceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let p = self.0;
        let mut s = serializer.serialize_struct("Province", 4)?;
        s.serialize_field("nameTh", p.name_th)?;
        s.serialize_field("lat", &p.lat)?;
        s.serialize_field("lng", &p.lng)?;
        let districts: Vec<DistrictEntry> = p.districts.iter().map(DistrictEntry).collect();
        s.serialize_field("districts", &districts)?;
        s.end()
    }
}

struct DistrictEntry(&'static District);

impl Serialize for DistrictEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let d = self.0;
        let mut s = serializer.serialize_struct("District", 4)?;
        s.serialize_field("key", d.key)?;
        s.serialize_field("nameTh", d.name_th)?;
        s.serialize_field("lat", &d.lat)?;
        s.serialize_field("lng", &d.lng)?;
        s.end()
    }
}

static PROVINCES: &[Province] = &[
    Province {
        key: "songkhla",
        name_th: "สงขลา",
        lat: 7.2075,
        lng: 100.5967,
        districts: &[
            District { key: "mueang", name_th: "เมืองสงขลา", lat: 7.2075, lng: 100.5967 },
            District { key: "hatyai", name_th: "หาดใหญ่", lat: 7.0086, lng: 100.4747 },
            District { key: "sadao", name_th: "สะเดา", lat: 6.6381, lng: 100.4183 },
            District { key: "thepha", name_th: "เทพา", lat: 6.8405, lng: 100.9792 },
            District { key: "nathawi", name_th: "นาทวี", lat: 6.7131, lng: 100.7231 },
            District { key: "ranot", name_th: "ระโนด", lat: 7.7730, lng: 100.3116 },
            District { key: "sathing", name_th: "สทิงพระ", lat: 7.5170, lng: 100.4200 },
            District { key: "singhanakhon", name_th: "สิงหนคร", lat: 7.2920, lng: 100.5550 },
            District { key: "khlong_hoi", name_th: "คลองหอยโข่ง", lat: 6.9770, lng: 100.4470 },
            District { key: "bang_klam", name_th: "บางกล่ำ", lat: 7.1320, lng: 100.5120 },
            District { key: "na_mom", name_th: "นาหม่อม", lat: 7.0900, lng: 100.6230 },
            District { key: "khuan_niang", name_th: "ควนเนียง", lat: 7.1750, lng: 100.4050 },
            District { key: "chana", name_th: "จะนะ", lat: 6.9110, lng: 100.7760 },
            District { key: "sabayoi", name_th: "สะบ้าย้อย", lat: 6.5680, lng: 100.9050 },
        ],
    },
    Province {
        key: "pattani",
        name_th: "ปัตตานี",
        lat: 6.8695,
        lng: 101.2500,
        districts: &[
            District { key: "mueang", name_th: "เมืองปัตตานี", lat: 6.8695, lng: 101.2500 },
            District { key: "nong_chik", name_th: "หนองจิก", lat: 6.9360, lng: 101.1810 },
            District { key: "mayo", name_th: "มายอ", lat: 6.6680, lng: 101.5100 },
            District { key: "yarang", name_th: "ยะรัง", lat: 6.7380, lng: 101.3660 },
            District { key: "sai_buri", name_th: "สายบุรี", lat: 6.6400, lng: 101.7920 },
            District { key: "kapho", name_th: "กะพ้อ", lat: 6.5060, lng: 101.7260 },
            District { key: "khok_pho", name_th: "โคกโพธิ์", lat: 6.8280, lng: 101.1450 },
            District { key: "panare", name_th: "ปะนาเระ", lat: 6.7900, lng: 101.5730 },
            District { key: "mae_lan", name_th: "แม่ลาน", lat: 6.9120, lng: 101.2250 },
            District { key: "thung_yang_daeng", name_th: "ทุ่งยางแดง", lat: 6.6080, lng: 101.5280 },
            District { key: "yaring", name_th: "ยะริง", lat: 6.7090, lng: 101.2360 },
            District { key: "bacho", name_th: "บาเจาะ", lat: 6.5630, lng: 101.6430 },
        ],
    },
    Province {
        key: "yala",
        name_th: "ยะลา",
        lat: 6.5413,
        lng: 101.2800,
        districts: &[
            District { key: "mueang", name_th: "เมืองยะลา", lat: 6.5413, lng: 101.2800 },
            District { key: "betong", name_th: "เบตง", lat: 5.7750, lng: 101.0700 },
            District { key: "bannang", name_th: "บันนังสตา", lat: 6.2640, lng: 101.2530 },
            District { key: "yaha", name_th: "ยะหา", lat: 6.4420, lng: 101.2100 },
            District { key: "raman", name_th: "รามัน", lat: 6.4680, lng: 101.3380 },
            District { key: "kabang", name_th: "กาบัง", lat: 6.1870, lng: 101.3020 },
            District { key: "krong_pinang", name_th: "กรงปินัง", lat: 6.3190, lng: 101.4260 },
            District { key: "than_to", name_th: "ธารโต", lat: 6.0010, lng: 101.1990 },
        ],
    },
    Province {
        key: "narathiwat",
        name_th: "นราธิวาส",
        lat: 6.4251,
        lng: 101.8233,
        districts: &[
            District { key: "mueang", name_th: "เมืองนราธิวาส", lat: 6.4251, lng: 101.8233 },
            District { key: "takbai", name_th: "ตากใบ", lat: 6.2580, lng: 102.0450 },
            District { key: "bacho", name_th: "บาเจาะ", lat: 6.5630, lng: 101.6430 },
            District { key: "yi_ngo", name_th: "ยี่งอ", lat: 6.4840, lng: 101.9350 },
            District { key: "ra_ngae", name_th: "ระแงะ", lat: 6.2300, lng: 101.8360 },
            District { key: "ruso", name_th: "รือเสาะ", lat: 6.2200, lng: 101.6990 },
            District { key: "si_sakhon", name_th: "ศรีสาคร", lat: 6.1600, lng: 101.6500 },
            District { key: "sukhirin", name_th: "สุคิริน", lat: 5.8840, lng: 101.7950 },
            District { key: "chanae", name_th: "จะแนะ", lat: 6.0640, lng: 101.7800 },
            District { key: "sungnoen", name_th: "สุไหงโก-ลก", lat: 6.0330, lng: 101.9730 },
            District { key: "waeng", name_th: "แว้ง", lat: 5.8490, lng: 101.9080 },
        ],
    },
    Province {
        key: "satun",
        name_th: "สตูล",
        lat: 6.6238,
        lng: 100.0673,
        districts: &[
            District { key: "mueang", name_th: "เมืองสตูล", lat: 6.6238, lng: 100.0673 },
            District { key: "khuan_don", name_th: "ควนโดน", lat: 6.7560, lng: 100.1250 },
            District { key: "khuan_kalong", name_th: "ควนกาหลง", lat: 6.9050, lng: 100.1730 },
            District { key: "tha_phae", name_th: "ท่าแพ", lat: 6.5840, lng: 100.2430 },
            District { key: "la_ngu", name_th: "ละงู", lat: 6.9140, lng: 99.8280 },
            District { key: "thung_wa", name_th: "ทุ่งหว้า", lat: 6.9140, lng: 99.6820 },
            District { key: "manang", name_th: "มะนัง", lat: 6.3390, lng: 100.3010 },
        ],
    },
    Province {
        key: "phuket",
        name_th: "ภูเก็ต",
        lat: 7.8804,
        lng: 98.3923,
        districts: &[
            District { key: "mueang", name_th: "เมืองภูเก็ต", lat: 7.8804, lng: 98.3923 },
            District { key: "kathu", name_th: "กะทู้", lat: 7.9050, lng: 98.3270 },
            District { key: "thalang", name_th: "ถลาง", lat: 8.0720, lng: 98.3550 },
        ],
    },
    Province {
        key: "trang",
        name_th: "ตรัง",
        lat: 7.5593,
        lng: 99.6113,
        districts: &[
            District { key: "mueang", name_th: "เมืองตรัง", lat: 7.5593, lng: 99.6113 },
            District { key: "kantang", name_th: "กันตัง", lat: 7.4060, lng: 99.5150 },
            District { key: "palian", name_th: "ปะเหลียน", lat: 7.2050, lng: 99.7360 },
            District { key: "sikao", name_th: "สิเกา", lat: 7.5850, lng: 99.3440 },
            District { key: "huai_yot", name_th: "ห้วยยอด", lat: 7.7920, lng: 99.6410 },
        ],
    },
    Province {
        key: "phatthalung",
        name_th: "พัทลุง",
        lat: 7.6166,
        lng: 100.0741,
        districts: &[
            District { key: "mueang", name_th: "เมืองพัทลุง", lat: 7.6166, lng: 100.0741 },
            District { key: "kong_ra", name_th: "กงหรา", lat: 7.4910, lng: 99.8540 },
            District { key: "pak_phayun", name_th: "ปากพะยูน", lat: 7.3480, lng: 100.2650 },
            District { key: "khuan_khanun", name_th: "ควนขนุน", lat: 7.7250, lng: 100.0160 },
        ],
    },
    Province {
        key: "krabi",
        name_th: "กระบี่",
        lat: 8.0863,
        lng: 98.9063,
        districts: &[
            District { key: "mueang", name_th: "เมืองกระบี่", lat: 8.0863, lng: 98.9063 },
            District { key: "ao_luek", name_th: "อ่าวลึก", lat: 8.3990, lng: 98.7680 },
            District { key: "khao_phanom", name_th: "เขาพนม", lat: 8.4730, lng: 99.1360 },
            District { key: "ko_lanta", name_th: "เกาะลันตา", lat: 7.6380, lng: 99.0780 },
        ],
    },
    Province {
        key: "surat_thani",
        name_th: "สุราษฎร์ธานี",
        lat: 9.1382,
        lng: 99.3214,
        districts: &[
            District { key: "mueang", name_th: "เมืองสุราษฎร์ธานี", lat: 9.1382, lng: 99.3214 },
            District { key: "ko_samui", name_th: "เกาะสมุย", lat: 9.5530, lng: 100.0680 },
            District { key: "chaiya", name_th: "ไชยา", lat: 9.3760, lng: 99.1820 },
        ],
    },
    Province {
        key: "bangkok",
        name_th: "กรุงเทพมหานคร",
        lat: 13.7563,
        lng: 100.5018,
        districts: &[
            District { key: "phra_nakhon", name_th: "พระนคร", lat: 13.7563, lng: 100.5018 },
            District { key: "min_buri", name_th: "มีนบุรี", lat: 13.8150, lng: 100.7120 },
            District { key: "lat_krabang", name_th: "ลาดกระบัง", lat: 13.7240, lng: 100.7800 },
            District { key: "bang_rak", name_th: "บางรัก", lat: 13.7280, lng: 100.5150 },
            District { key: "chatuchak", name_th: "จตุจักร", lat: 13.8220, lng: 100.5630 },
        ],
    },
    Province {
        key: "chiangmai",
        name_th: "เชียงใหม่",
        lat: 18.7883,
        lng: 98.9853,
        districts: &[
            District { key: "mueang", name_th: "เมืองเชียงใหม่", lat: 18.7883, lng: 98.9853 },
            District { key: "hang_dong", name_th: "หางดง", lat: 18.6750, lng: 98.9440 },
            District { key: "san_sai", name_th: "สันทราย", lat: 18.8660, lng: 99.0630 },
            District { key: "mae_rim", name_th: "แม่ริม", lat: 18.9200, lng: 98.9560 },
        ],
    },
];
