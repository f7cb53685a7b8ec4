//! # Demonstration Corpus
//!
//! Short Azerbaijani texts, grouped by domain, that exercise every entity type.
//! Used by the web front end ("load example" buttons) and by the tests below.

/// `(domain, text)` pairs.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Dövlət xidmətləri",
            "Vətəndaş Məmmədov Elçin (FIN: 5ARPXK2) ASAN xidmətə müraciət etdi. Əlavə məlumat üçün https://e-gov.az/az/services ünvanına daxil olun və ya info@gov.az ünvanına yazın.",
        ),
        (
            "Bank",
            "Ödəniş \"Kapital Bank\" ASC-dəki AZ21NABZ00000000137010001944 hesabına köçürülməlidir. Şirkətin VÖEN: 1402345671. Sualınız olarsa +994 12 345 67 89 nömrəsinə zəng edin.",
        ),
        (
            "Nəqliyyat",
            "10-AB-123 dövlət nömrə nişanlı avtomobil Bakı-Sumqayıt yolunda saxlanıldı. Sürücü ilə 050 123 45 67 nömrəsi ilə əlaqə saxlamaq mümkündür.",
        ),
        (
            "Vergi",
            "Vergi ödəyicisinin eyniləşdirmə nömrəsi 1700567891 olan müəssisə hesabatı vaxtında təqdim etmədi. Ətraflı: http://www.taxes.gov.az/az/page/vergi-ucotu.",
        ),
        (
            "Ziddiyyətlər",
            "Müştəri 0551234567 nömrəsindən zəng etdi, FIN kodu 7BXKP3Z, lakin sənəddə fin:7bxkp3z kimi yazılıb. Əlaqə: elcin.mammadov+bank@mail.example.az.",
        ),
    ]
}
