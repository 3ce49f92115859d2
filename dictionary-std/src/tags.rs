//! Data element tag declarations
//!
//! Each attribute is declared once:
//! the same declaration yields the named tag constant
//! and the entry indexed by the run-time dictionary.

use dicom_lite_core::dictionary::{DataDictionaryEntryRef, TagRange::Single};
use dicom_lite_core::header::{Tag, VR};

macro_rules! declare_tags {
    ($($name:ident = ($group:literal, $element:literal) $alias:literal $vr:ident;)*) => {
        $(
            #[doc = concat!($alias, " ", stringify!($vr))]
            #[rustfmt::skip]
            pub const $name: Tag = Tag($group, $element);
        )*

        /// All attributes of the standard dictionary.
        pub(crate) const ENTRIES: &[DataDictionaryEntryRef<'static>] = &[
            $(
                DataDictionaryEntryRef {
                    tag: Single($name),
                    alias: $alias,
                    vr: VR::$vr,
                },
            )*
        ];
    };
}

declare_tags! {
    COMMAND_GROUP_LENGTH = (0x0000, 0x0000) "CommandGroupLength" UL;
    FILE_META_INFORMATION_GROUP_LENGTH = (0x0002, 0x0000) "FileMetaInformationGroupLength" UL;
    FILE_META_INFORMATION_VERSION = (0x0002, 0x0001) "FileMetaInformationVersion" OB;
    MEDIA_STORAGE_SOP_CLASS_UID = (0x0002, 0x0002) "MediaStorageSOPClassUID" UI;
    MEDIA_STORAGE_SOP_INSTANCE_UID = (0x0002, 0x0003) "MediaStorageSOPInstanceUID" UI;
    TRANSFER_SYNTAX_UID = (0x0002, 0x0010) "TransferSyntaxUID" UI;
    IMPLEMENTATION_CLASS_UID = (0x0002, 0x0012) "ImplementationClassUID" UI;
    IMPLEMENTATION_VERSION_NAME = (0x0002, 0x0013) "ImplementationVersionName" SH;
    SOURCE_APPLICATION_ENTITY_TITLE = (0x0002, 0x0016) "SourceApplicationEntityTitle" AE;
    SENDING_APPLICATION_ENTITY_TITLE = (0x0002, 0x0017) "SendingApplicationEntityTitle" AE;
    RECEIVING_APPLICATION_ENTITY_TITLE = (0x0002, 0x0018) "ReceivingApplicationEntityTitle" AE;
    PRIVATE_INFORMATION_CREATOR_UID = (0x0002, 0x0100) "PrivateInformationCreatorUID" UI;
    PRIVATE_INFORMATION = (0x0002, 0x0102) "PrivateInformation" OB;
    SPECIFIC_CHARACTER_SET = (0x0008, 0x0005) "SpecificCharacterSet" CS;
    IMAGE_TYPE = (0x0008, 0x0008) "ImageType" CS;
    INSTANCE_CREATION_DATE = (0x0008, 0x0012) "InstanceCreationDate" DA;
    INSTANCE_CREATION_TIME = (0x0008, 0x0013) "InstanceCreationTime" TM;
    SOP_CLASS_UID = (0x0008, 0x0016) "SOPClassUID" UI;
    SOP_INSTANCE_UID = (0x0008, 0x0018) "SOPInstanceUID" UI;
    STUDY_DATE = (0x0008, 0x0020) "StudyDate" DA;
    SERIES_DATE = (0x0008, 0x0021) "SeriesDate" DA;
    ACQUISITION_DATE = (0x0008, 0x0022) "AcquisitionDate" DA;
    CONTENT_DATE = (0x0008, 0x0023) "ContentDate" DA;
    STUDY_TIME = (0x0008, 0x0030) "StudyTime" TM;
    SERIES_TIME = (0x0008, 0x0031) "SeriesTime" TM;
    CONTENT_TIME = (0x0008, 0x0033) "ContentTime" TM;
    ACCESSION_NUMBER = (0x0008, 0x0050) "AccessionNumber" SH;
    MODALITY = (0x0008, 0x0060) "Modality" CS;
    MANUFACTURER = (0x0008, 0x0070) "Manufacturer" LO;
    INSTITUTION_NAME = (0x0008, 0x0080) "InstitutionName" LO;
    REFERRING_PHYSICIAN_NAME = (0x0008, 0x0090) "ReferringPhysicianName" PN;
    REFERRING_PHYSICIAN_IDENTIFICATION_SEQUENCE = (0x0008, 0x0096) "ReferringPhysicianIdentificationSequence" SQ;
    CODE_VALUE = (0x0008, 0x0100) "CodeValue" SH;
    CODING_SCHEME_DESIGNATOR = (0x0008, 0x0102) "CodingSchemeDesignator" SH;
    CODE_MEANING = (0x0008, 0x0104) "CodeMeaning" LO;
    STUDY_DESCRIPTION = (0x0008, 0x1030) "StudyDescription" LO;
    PROCEDURE_CODE_SEQUENCE = (0x0008, 0x1032) "ProcedureCodeSequence" SQ;
    SERIES_DESCRIPTION = (0x0008, 0x103E) "SeriesDescription" LO;
    OPERATORS_NAME = (0x0008, 0x1070) "OperatorsName" PN;
    ADMITTING_DIAGNOSES_CODE_SEQUENCE = (0x0008, 0x1084) "AdmittingDiagnosesCodeSequence" SQ;
    MANUFACTURER_MODEL_NAME = (0x0008, 0x1090) "ManufacturerModelName" LO;
    REFERENCED_STUDY_SEQUENCE = (0x0008, 0x1110) "ReferencedStudySequence" SQ;
    REFERENCED_PERFORMED_PROCEDURE_STEP_SEQUENCE = (0x0008, 0x1111) "ReferencedPerformedProcedureStepSequence" SQ;
    REFERENCED_SERIES_SEQUENCE = (0x0008, 0x1115) "ReferencedSeriesSequence" SQ;
    REFERENCED_PATIENT_SEQUENCE = (0x0008, 0x1120) "ReferencedPatientSequence" SQ;
    REFERENCED_IMAGE_SEQUENCE = (0x0008, 0x1140) "ReferencedImageSequence" SQ;
    REFERENCED_SOP_CLASS_UID = (0x0008, 0x1150) "ReferencedSOPClassUID" UI;
    REFERENCED_SOP_INSTANCE_UID = (0x0008, 0x1155) "ReferencedSOPInstanceUID" UI;
    REFERENCED_SOP_SEQUENCE = (0x0008, 0x1199) "ReferencedSOPSequence" SQ;
    RELATED_SERIES_SEQUENCE = (0x0008, 0x1250) "RelatedSeriesSequence" SQ;
    DERIVATION_DESCRIPTION = (0x0008, 0x2111) "DerivationDescription" ST;
    SOURCE_IMAGE_SEQUENCE = (0x0008, 0x2112) "SourceImageSequence" SQ;
    REFERENCED_RAW_DATA_SEQUENCE = (0x0008, 0x9121) "ReferencedRawDataSequence" SQ;
    DERIVATION_CODE_SEQUENCE = (0x0008, 0x9215) "DerivationCodeSequence" SQ;
    PATIENT_NAME = (0x0010, 0x0010) "PatientName" PN;
    PATIENT_ID = (0x0010, 0x0020) "PatientID" LO;
    PATIENT_BIRTH_DATE = (0x0010, 0x0030) "PatientBirthDate" DA;
    PATIENT_SEX = (0x0010, 0x0040) "PatientSex" CS;
    OTHER_PATIENT_IDS_SEQUENCE = (0x0010, 0x1002) "OtherPatientIDsSequence" SQ;
    PATIENT_AGE = (0x0010, 0x1010) "PatientAge" AS;
    PATIENT_SIZE = (0x0010, 0x1020) "PatientSize" DS;
    PATIENT_WEIGHT = (0x0010, 0x1030) "PatientWeight" DS;
    BODY_PART_EXAMINED = (0x0018, 0x0015) "BodyPartExamined" CS;
    SLICE_THICKNESS = (0x0018, 0x0050) "SliceThickness" DS;
    KVP = (0x0018, 0x0060) "KVP" DS;
    SPACING_BETWEEN_SLICES = (0x0018, 0x0088) "SpacingBetweenSlices" DS;
    SOFTWARE_VERSIONS = (0x0018, 0x1020) "SoftwareVersions" LO;
    PROTOCOL_NAME = (0x0018, 0x1030) "ProtocolName" LO;
    PATIENT_POSITION = (0x0018, 0x5100) "PatientPosition" CS;
    STUDY_INSTANCE_UID = (0x0020, 0x000D) "StudyInstanceUID" UI;
    SERIES_INSTANCE_UID = (0x0020, 0x000E) "SeriesInstanceUID" UI;
    STUDY_ID = (0x0020, 0x0010) "StudyID" SH;
    SERIES_NUMBER = (0x0020, 0x0011) "SeriesNumber" IS;
    ACQUISITION_NUMBER = (0x0020, 0x0012) "AcquisitionNumber" IS;
    INSTANCE_NUMBER = (0x0020, 0x0013) "InstanceNumber" IS;
    IMAGE_POSITION_PATIENT = (0x0020, 0x0032) "ImagePositionPatient" DS;
    IMAGE_ORIENTATION_PATIENT = (0x0020, 0x0037) "ImageOrientationPatient" DS;
    FRAME_OF_REFERENCE_UID = (0x0020, 0x0052) "FrameOfReferenceUID" UI;
    SLICE_LOCATION = (0x0020, 0x1041) "SliceLocation" DS;
    FRAME_CONTENT_SEQUENCE = (0x0020, 0x9111) "FrameContentSequence" SQ;
    PLANE_POSITION_SEQUENCE = (0x0020, 0x9113) "PlanePositionSequence" SQ;
    PLANE_ORIENTATION_SEQUENCE = (0x0020, 0x9116) "PlaneOrientationSequence" SQ;
    DIMENSION_ORGANIZATION_SEQUENCE = (0x0020, 0x9221) "DimensionOrganizationSequence" SQ;
    DIMENSION_INDEX_SEQUENCE = (0x0020, 0x9222) "DimensionIndexSequence" SQ;
    SAMPLES_PER_PIXEL = (0x0028, 0x0002) "SamplesPerPixel" US;
    PHOTOMETRIC_INTERPRETATION = (0x0028, 0x0004) "PhotometricInterpretation" CS;
    PLANAR_CONFIGURATION = (0x0028, 0x0006) "PlanarConfiguration" US;
    NUMBER_OF_FRAMES = (0x0028, 0x0008) "NumberOfFrames" IS;
    ROWS = (0x0028, 0x0010) "Rows" US;
    COLUMNS = (0x0028, 0x0011) "Columns" US;
    PIXEL_SPACING = (0x0028, 0x0030) "PixelSpacing" DS;
    PIXEL_ASPECT_RATIO = (0x0028, 0x0034) "PixelAspectRatio" IS;
    BITS_ALLOCATED = (0x0028, 0x0100) "BitsAllocated" US;
    BITS_STORED = (0x0028, 0x0101) "BitsStored" US;
    HIGH_BIT = (0x0028, 0x0102) "HighBit" US;
    PIXEL_REPRESENTATION = (0x0028, 0x0103) "PixelRepresentation" US;
    SMALLEST_IMAGE_PIXEL_VALUE = (0x0028, 0x0106) "SmallestImagePixelValue" US;
    LARGEST_IMAGE_PIXEL_VALUE = (0x0028, 0x0107) "LargestImagePixelValue" US;
    BURNED_IN_ANNOTATION = (0x0028, 0x0301) "BurnedInAnnotation" CS;
    WINDOW_CENTER = (0x0028, 0x1050) "WindowCenter" DS;
    WINDOW_WIDTH = (0x0028, 0x1051) "WindowWidth" DS;
    RESCALE_INTERCEPT = (0x0028, 0x1052) "RescaleIntercept" DS;
    RESCALE_SLOPE = (0x0028, 0x1053) "RescaleSlope" DS;
    RESCALE_TYPE = (0x0028, 0x1054) "RescaleType" LO;
    LOSSY_IMAGE_COMPRESSION = (0x0028, 0x2110) "LossyImageCompression" CS;
    MODALITY_LUT_SEQUENCE = (0x0028, 0x3000) "ModalityLUTSequence" SQ;
    VOI_LUT_SEQUENCE = (0x0028, 0x3010) "VOILUTSequence" SQ;
    PIXEL_MEASURES_SEQUENCE = (0x0028, 0x9110) "PixelMeasuresSequence" SQ;
    REQUESTED_PROCEDURE_CODE_SEQUENCE = (0x0032, 0x1064) "RequestedProcedureCodeSequence" SQ;
    SCHEDULED_PROTOCOL_CODE_SEQUENCE = (0x0040, 0x0008) "ScheduledProtocolCodeSequence" SQ;
    SCHEDULED_PROCEDURE_STEP_SEQUENCE = (0x0040, 0x0100) "ScheduledProcedureStepSequence" SQ;
    PERFORMED_PROTOCOL_CODE_SEQUENCE = (0x0040, 0x0260) "PerformedProtocolCodeSequence" SQ;
    REQUEST_ATTRIBUTES_SEQUENCE = (0x0040, 0x0275) "RequestAttributesSequence" SQ;
    ACQUISITION_CONTEXT_SEQUENCE = (0x0040, 0x0555) "AcquisitionContextSequence" SQ;
    CONCEPT_NAME_CODE_SEQUENCE = (0x0040, 0xA043) "ConceptNameCodeSequence" SQ;
    CONTENT_SEQUENCE = (0x0040, 0xA730) "ContentSequence" SQ;
    RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE = (0x0054, 0x0016) "RadiopharmaceuticalInformationSequence" SQ;
    VIEW_CODE_SEQUENCE = (0x0054, 0x0220) "ViewCodeSequence" SQ;
    ICON_IMAGE_SEQUENCE = (0x0088, 0x0200) "IconImageSequence" SQ;
    ORIGINAL_ATTRIBUTES_SEQUENCE = (0x0400, 0x0561) "OriginalAttributesSequence" SQ;
    SHARED_FUNCTIONAL_GROUPS_SEQUENCE = (0x5200, 0x9229) "SharedFunctionalGroupsSequence" SQ;
    PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE = (0x5200, 0x9230) "PerFrameFunctionalGroupsSequence" SQ;
    EXTENDED_OFFSET_TABLE = (0x7FE0, 0x0001) "ExtendedOffsetTable" OV;
    EXTENDED_OFFSET_TABLE_LENGTHS = (0x7FE0, 0x0002) "ExtendedOffsetTableLengths" OV;
    PIXEL_DATA = (0x7FE0, 0x0010) "PixelData" OW;
}

/// Item (FFFE,E000)
pub const ITEM: Tag = Tag::ITEM;
/// Item Delimitation Item (FFFE,E00D)
pub const ITEM_DELIMITATION_ITEM: Tag = Tag::ITEM_DELIMITER;
/// Sequence Delimitation Item (FFFE,E0DD)
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag::SEQUENCE_DELIMITER;
