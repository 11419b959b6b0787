// 카탈로그 조회 SQL 쿼리 (모두 읽기 전용)

/// 서버 현재 시각과 세션 시간대의 UTC 오프셋(초) 조회
/// EXTRACT 결과는 버전에 따라 numeric 또는 double 이므로 int4로 캐스팅
pub const SELECT_NOW: &str = "SELECT NOW(), EXTRACT(TIMEZONE FROM NOW())::int4";

/// 스키마 내 테이블 존재 여부 확인
/// information_schema 컬럼은 sql_identifier 도메인이므로 파라미터를 text로 캐스팅
pub const TABLE_EXISTS: &str = "
    SELECT EXISTS (
        SELECT FROM information_schema.tables
        WHERE table_schema = $1::text
        AND table_name = $2::text
    )
";

/// 구체화 뷰 존재 여부 확인
pub const MATVIEW_EXISTS: &str = "
    SELECT EXISTS (
        SELECT FROM pg_matviews
        WHERE matviewname = $1::text
    )
";

/// 부모 테이블별 파티션(자식 테이블) 목록 조회
/// 존재하지 않는 부모는 to_regclass가 NULL을 반환하므로 결과에서 빠짐
pub const LIST_PARTITIONS: &str = "
    SELECT p.parent, c.inhrelid::regclass::text AS child
    FROM unnest($1::text[]) WITH ORDINALITY AS p(parent, ord)
    JOIN pg_inherits c ON c.inhparent = to_regclass(p.parent)
    ORDER BY p.ord, child
";
