use crate::ingestion::records::{present, FacilityRecord, NewsRecord, NormalizedFacility};

/// Tag carried by every chunk; for facilities it also forms the suffix of
/// the stored `source_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    LocationInfo,
    OperatingHours,
    UsageInfo,
    ContactInfo,
    News,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::LocationInfo => "location_info",
            ChunkType::OperatingHours => "operating_hours",
            ChunkType::UsageInfo => "usage_info",
            ChunkType::ContactInfo => "contact_info",
            ChunkType::News => "news",
        }
    }
}

/// One self-contained passage derived from a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_type: ChunkType,
    pub content: String,
}

/// One row from an external dataset.
#[derive(Debug, Clone)]
pub enum SourceRecord {
    Facility(FacilityRecord),
    News(NewsRecord),
}

/// Maps one record to its retrievable chunks. Pure; facility records
/// always yield the same four facets in order, news records yield one
/// chunk or none.
pub fn chunk(record: &SourceRecord) -> Vec<Chunk> {
    match record {
        SourceRecord::Facility(record) => facility_chunks(&record.normalize()),
        SourceRecord::News(record) => news_chunk(record).into_iter().collect(),
    }
}

fn facility_chunks(f: &NormalizedFacility) -> Vec<Chunk> {
    vec![
        Chunk {
            chunk_type: ChunkType::LocationInfo,
            content: format!(
                "{}의 종류는 {}이며, 주소는 {}입니다.",
                f.name, f.kind, f.address
            ),
        },
        Chunk {
            chunk_type: ChunkType::OperatingHours,
            content: format!(
                "{}의 운영 시간 정보입니다. 주중 운영 시간은 {}, 주말 운영 시간은 {}이며, 휴무일은 {}입니다.",
                f.name, f.weekday_hours, f.weekend_hours, f.closed_days
            ),
        },
        Chunk {
            chunk_type: ChunkType::UsageInfo,
            content: format!(
                "{}의 이용 정보입니다. 이 시설은 {}이며, 수용 가능 인원은 {}명입니다. 주요 편의시설은 {}이며, 신청 방법은 {}입니다.",
                f.name, f.fee_label, f.capacity, f.amenities, f.application
            ),
        },
        Chunk {
            chunk_type: ChunkType::ContactInfo,
            content: format!(
                "{}의 연락처 정보입니다. 담당 부서는 {}이며, 연락처는 {}입니다.",
                f.name, f.department, f.contact
            ),
        },
    ]
}

fn news_chunk(record: &NewsRecord) -> Option<Chunk> {
    if record.is_empty() {
        return None;
    }

    let title = present(&record.title).unwrap_or_default();
    let summary = present(&record.summary).unwrap_or_default();
    let mut content = format!("뉴스 제목: {}\n내용 요약: {}", title, summary);
    if let Some(spot) = present(&record.spot) {
        content.push_str(&format!("\n관련 장소: {}", spot));
    }

    Some(Chunk {
        chunk_type: ChunkType::News,
        content,
    })
}
